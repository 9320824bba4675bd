//! Reference CSV files offered for download

use crate::ImportError;
use csv::Writer;
use pharmalist_domain::DomainKey;

/// File name suggested for a downloaded template
pub const SAMPLE_FILE_NAME: &str = "sample_pharma_data.csv";

const PRESCRIBER_HEADERS: &[&str] = &[
    "id",
    "name",
    "designation",
    "specialty",
    "institution",
    "location",
    "phone",
    "email",
    "tier",
    "remarks",
];

const PRESCRIBER_ROWS: &[&[&str]] = &[
    &[
        "DOC001",
        "Dr. Rajesh Kumar",
        "Senior Consultant",
        "Cardiology",
        "Apollo Hospital",
        "Delhi",
        "+91-9876543210",
        "rajesh.kumar@apollo.com",
        "A",
        "Key opinion leader in interventional cardiology",
    ],
    &[
        "DOC002",
        "Dr. Priya Sharma",
        "Head of Department",
        "Neurology",
        "Fortis Healthcare",
        "Mumbai",
        "+91-9876543211",
        "priya.sharma@fortis.com",
        "A",
        "Specializes in stroke management",
    ],
    &[
        "DOC003",
        "Dr. Amit Patel",
        "Consultant",
        "Orthopedics",
        "Max Hospital",
        "Bangalore",
        "+91-9876543212",
        "amit.patel@max.com",
        "B",
        "Sports injury specialist",
    ],
    &[
        "DOC004",
        "Dr. Sneha Reddy",
        "Associate Professor",
        "Oncology",
        "AIIMS",
        "Delhi",
        "+91-9876543213",
        "sneha.reddy@aiims.edu",
        "A",
        "Research focus on breast cancer",
    ],
    &[
        "DOC005",
        "Dr. Vikram Singh",
        "Consultant",
        "Gastroenterology",
        "Medanta",
        "Gurugram",
        "+91-9876543214",
        "vikram.singh@medanta.com",
        "B",
        "Expert in liver diseases",
    ],
];

const ACCOUNT_HEADERS: &[&str] = &["id", "name", "designation", "institution", "location", "influence_level"];

const ACCOUNT_ROWS: &[&[&str]] = &[
    &["ACC001", "Dr. Meera Iyer", "Pharmacy & Therapeutics Chair", "Max Healthcare", "Delhi", "High"],
    &["ACC002", "Mr. Sanjay Gupta", "Procurement Head", "Medanta", "Gurugram", "Medium"],
    &["ACC003", "Ms. Kavita Menon", "Formulary Pharmacist", "Apollo Hospital", "Chennai", "High"],
];

const MARKETING_HEADERS: &[&str] = &["id", "name", "specialty", "email", "channel", "consent"];

const MARKETING_ROWS: &[&[&str]] = &[
    &["MKT001", "Dr. Amit Patel", "Orthopedics", "amit.patel@max.com", "Email", "Yes"],
    &["MKT002", "Dr. Vikram Singh", "Gastroenterology", "vikram.singh@medanta.com", "Webinar", "Yes"],
    &["MKT003", "Dr. Priya Sharma", "Neurology", "priya.sharma@fortis.com", "In-person", "No"],
];

const DATA_HEADERS: &[&str] = &["id", "name", "segment", "source", "last_verified"];

const DATA_ROWS: &[&[&str]] = &[
    &["DAT001", "Dr. Rajesh Kumar", "High Prescriber", "CRM", "2025-01-15"],
    &["DAT002", "Dr. Sneha Reddy", "Emerging Prescriber", "Claims", "2025-02-03"],
    &["DAT003", "Dr. Vikram Singh", "Lapsed", "CRM", "2024-11-20"],
];

/// Domain whose list types include `list_type`
fn domain_of(list_type: &str) -> Option<DomainKey> {
    DomainKey::ALL
        .into_iter()
        .find(|key| key.allows_list_type(list_type))
}

/// Reference CSV for a list type
///
/// The output depends only on the domain the list type belongs to. Unknown
/// list types get the prescriber template.
///
/// # Errors
/// Returns error only if the in-memory writer fails
pub fn sample_template(list_type: &str) -> Result<String, ImportError> {
    let (headers, rows) = match domain_of(list_type) {
        Some(DomainKey::Account) => (ACCOUNT_HEADERS, ACCOUNT_ROWS),
        Some(DomainKey::Marketing) => (MARKETING_HEADERS, MARKETING_ROWS),
        Some(DomainKey::Data) => (DATA_HEADERS, DATA_ROWS),
        Some(DomainKey::Customer) | None => (PRESCRIBER_HEADERS, PRESCRIBER_ROWS),
    };

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(*row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Template(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::Template(e.to_string()))
}
