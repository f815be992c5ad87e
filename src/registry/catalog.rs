//! Built-in closing process catalog

use super::step_config::{Applicability, StepConfig};

/// Steps of a property closing process, in workflow order
pub fn closing_process_steps() -> Vec<StepConfig> {
    vec![
        StepConfig::new("reservationPaid", "Reservation fee paid")
            .requires("payment_receipt", "Payment receipt"),
        StepConfig::new("promiseSent", "Promise of sale sent")
            .requires("promise_draft", "Promise draft"),
        StepConfig::new("promiseSigned", "Promise of sale signed")
            .requires("contract_signed", "Signed promise contract"),
        StepConfig::new("titleStudyPaid", "Title study paid")
            .applicable_when(Applicability::Financed)
            .requires("title_study_receipt", "Title study receipt"),
        StepConfig::new("appraisalCompleted", "Property appraisal completed")
            .applicable_when(Applicability::Financed)
            .requires("appraisal_report", "Appraisal report"),
        StepConfig::new("loanApproved", "Loan approved")
            .applicable_when(Applicability::Financed)
            .requires("approval_letter", "Approval letter"),
        StepConfig::new("subsidyApproved", "Housing subsidy approved")
            .applicable_when(Applicability::Subsidy)
            .requires("subsidy_resolution", "Subsidy resolution"),
        StepConfig::new("severanceFundsTransferred", "Severance funds transferred")
            .applicable_when(Applicability::SeveranceFunds)
            .requires("transfer_certificate", "Transfer certificate"),
        StepConfig::new("deedSigned", "Deed signed")
            .requires("deed", "Signed deed")
            .requires("contract_signed", "Signed purchase contract"),
        StepConfig::new("deedRegistered", "Deed registered")
            .requires("registration_certificate", "Registration certificate"),
        StepConfig::new("keysDelivered", "Keys delivered")
            .requires("delivery_certificate", "Delivery certificate"),
    ]
}
