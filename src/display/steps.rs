//! Step catalog display formatting

use crate::models::FinancialContext;
use crate::registry::{Applicability, StepConfigRegistry};

/// Format the catalog, numbering the steps applicable under `ctx`
///
/// Steps that do not apply are listed with a dash instead of a number.
pub fn format_step_list(registry: &StepConfigRegistry, ctx: &FinancialContext) -> String {
    if registry.steps().is_empty() {
        return "No steps configured.".to_string();
    }

    let key_width = registry
        .steps()
        .iter()
        .map(|s| s.key.len())
        .max()
        .unwrap_or(3)
        .max(3);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<key_width$}  {}\n",
        "#",
        "Key",
        "Step",
        key_width = key_width,
    ));
    output.push_str(&format!(
        "{:->5}  {:-<key_width$}  {:-<20}\n",
        "",
        "",
        "",
        key_width = key_width,
    ));

    for step in registry.steps() {
        let number = registry
            .position(&step.key, ctx)
            .map(|p| format!("{}/{}", p.number, p.total))
            .unwrap_or_else(|| "-".to_string());

        let mut line = format!(
            "{:>5}  {:<key_width$}  {}",
            number,
            step.key,
            step.label,
            key_width = key_width,
        );
        if step.applicability != Applicability::Always {
            line.push_str(&format!("  [{}]", describe(&step.applicability)));
        }
        output.push_str(&line);
        output.push('\n');

        for slot in &step.required_evidence {
            output.push_str(&format!(
                "{:>5}  {:<key_width$}    evidence: {}\n",
                "",
                "",
                slot.label,
                key_width = key_width,
            ));
        }
    }

    output.push_str(&format!(
        "\nApplicable: {} of {} steps ({})\n",
        registry.applicable_steps(ctx).len(),
        registry.steps().len(),
        ctx.payment_method
    ));
    output
}

/// Short description of an applicability condition
pub fn describe(applicability: &Applicability) -> String {
    match applicability {
        Applicability::Always => "always".to_string(),
        Applicability::Financed => "financed".to_string(),
        Applicability::PaymentMethod { methods } => methods
            .iter()
            .map(|m| m.to_string().to_lowercase())
            .collect::<Vec<_>>()
            .join(" or "),
        Applicability::Subsidy => "subsidy".to_string(),
        Applicability::SeveranceFunds => "severance funds".to_string(),
        Applicability::AllOf { conditions } => join(conditions, " and "),
        Applicability::AnyOf { conditions } => join(conditions, " or "),
        Applicability::Not { condition } => format!("not {}", describe(condition)),
    }
}

fn join(conditions: &[Applicability], separator: &str) -> String {
    let parts: Vec<_> = conditions.iter().map(describe).collect();
    format!("({})", parts.join(separator))
}
