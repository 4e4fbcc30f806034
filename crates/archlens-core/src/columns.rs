//! Well-known columns of an architecture inventory export.
//!
//! None of these columns is required. Every metric that reads one of them
//! checks for its presence first and is simply omitted when it is absent.

pub const APPLICATION_NAME: &str = "Application_Name";
pub const BUSINESS_CRITICALITY: &str = "Business_Criticality";
pub const OWNER_DEPARTMENT: &str = "Owner_Department";
pub const MAINTENANCE_COST: &str = "Maintenance_Cost";
pub const DEVELOPMENT_COST: &str = "Development_Cost";
pub const USER_COUNT: &str = "User_Count";
pub const DATA_VOLUME: &str = "Data_Volume";
pub const RISK_LEVEL: &str = "Risk_Level";
pub const COMPLIANCE_STATUS: &str = "Compliance_Status";
pub const SECURITY_SCORE: &str = "Security_Score";
pub const VULNERABILITY_COUNT: &str = "Vulnerability_Count";
pub const PERFORMANCE_SCORE: &str = "Performance_Score";
pub const AVAILABILITY_PERCENTAGE: &str = "Availability_Percentage";
pub const INTEGRATION_COUNT: &str = "Integration_Count";
pub const INCIDENT_COUNT: &str = "Incident_Count";
pub const LAST_UPDATED: &str = "Last_Updated";

/// Columns whose values must never be negative.
pub const NON_NEGATIVE_COLUMNS: [&str; 4] =
    [MAINTENANCE_COST, DEVELOPMENT_COST, USER_COUNT, DATA_VOLUME];

/// Columns expressed on a 0..=100 scale.
pub const BOUNDED_SCORE_COLUMNS: [&str; 3] =
    [PERFORMANCE_SCORE, SECURITY_SCORE, AVAILABILITY_PERCENTAGE];

/// Numeric columns included in the correlation matrix, in display order.
pub const CORRELATION_COLUMNS: [&str; 10] = [
    MAINTENANCE_COST,
    DEVELOPMENT_COST,
    USER_COUNT,
    DATA_VOLUME,
    PERFORMANCE_SCORE,
    SECURITY_SCORE,
    AVAILABILITY_PERCENTAGE,
    INTEGRATION_COUNT,
    VULNERABILITY_COUNT,
    INCIDENT_COUNT,
];

/// Risk labels counted as high risk. Matching is exact and case-sensitive.
pub const HIGH_RISK_LABELS: [&str; 2] = ["High", "Critical"];

/// Compliance label counted as non-compliant. Matching is exact.
pub const NON_COMPLIANT_LABEL: &str = "Non-Compliant";
