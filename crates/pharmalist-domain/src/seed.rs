//! Fixed sample dataset used by `reset_to_default`
//!
//! Every id and timestamp is a constant so that two resets produce
//! deep-equal state.

use crate::ids::{ItemId, ListId, VersionId, WorkLogId};
use crate::list::{Attributes, Item, ListRecord};
use crate::registry::DomainKey;
use crate::version::{ChangesSummary, ListVersion};
use crate::worklog::WorkLog;

/// Timestamp stamped on every seeded record (2025-01-01T00:00:00Z)
pub const SEED_TIMESTAMP: u64 = 1_735_689_600;

/// Lists, versions and work logs of the sample dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDataset {
    /// Seeded lists in creation order
    pub lists: Vec<ListRecord>,
    /// Versions of all seeded lists
    pub versions: Vec<ListVersion>,
    /// Work logs of all seeded lists
    pub work_logs: Vec<WorkLog>,
}

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect()
}

fn item(n: u128, pairs: &[(&str, &str)]) -> Item {
    Item {
        id: ItemId::from_value(0x2000 + n),
        attributes: attributes(pairs),
    }
}

struct SeedVersion {
    added: usize,
    rationale: &'static str,
}

struct Builder {
    dataset: SeedDataset,
    next_version: u128,
    next_log: u128,
}

impl Builder {
    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        id: u128,
        category: DomainKey,
        list_type: &str,
        purpose: &str,
        requester: (&str, &str),
        items: Vec<Item>,
        history: &[SeedVersion],
    ) {
        let list_id = ListId::from_value(id);
        let mut snapshot_len = 0;
        for (i, step) in history.iter().enumerate() {
            let number = i as u32 + 1;
            let timestamp = SEED_TIMESTAMP + i as u64 * 86_400;
            snapshot_len += step.added;
            self.next_version += 1;
            self.dataset.versions.push(ListVersion {
                id: VersionId::from_value(0x3000 + self.next_version),
                list_id,
                version_number: number,
                snapshot_len,
                changes_summary: ChangesSummary::added(step.added),
                rationale: step.rationale.to_string(),
                updated_by: requester.0.to_string(),
                created_at: timestamp,
            });
            self.next_log += 1;
            let action = if number == 1 {
                "Created list".to_string()
            } else {
                format!("Added {} items (version {})", step.added, number)
            };
            self.dataset.work_logs.push(WorkLog {
                id: WorkLogId::from_value(0x4000 + self.next_log),
                list_id,
                version_number: Some(number),
                action,
                performed_by: requester.0.to_string(),
                timestamp,
            });
        }

        self.dataset.lists.push(ListRecord {
            id: list_id,
            category,
            list_type: Some(list_type.to_string()),
            purpose: purpose.to_string(),
            requester_name: requester.0.to_string(),
            requester_role: requester.1.to_string(),
            version_number: history.len() as u32,
            created_at: SEED_TIMESTAMP,
            updated_at: SEED_TIMESTAMP + (history.len() as u64 - 1) * 86_400,
            current_snapshot: items,
        });
    }
}

/// Build the sample dataset
pub fn default_dataset() -> SeedDataset {
    let mut builder = Builder {
        dataset: SeedDataset {
            lists: Vec::new(),
            versions: Vec::new(),
            work_logs: Vec::new(),
        },
        next_version: 0,
        next_log: 0,
    };

    builder.push(
        0x1001,
        DomainKey::Customer,
        "Target Lists",
        "Q3 Cardiology Target List",
        ("Anita Desai", "Brand Manager"),
        vec![
            item(1, &[
                ("name", "Dr. Rajesh Kumar"),
                ("specialty", "Cardiology"),
                ("institution", "Apollo Hospital"),
                ("location", "Delhi"),
                ("email", "rajesh.kumar@apollo.com"),
                ("tier", "A"),
            ]),
            item(2, &[
                ("name", "Dr. Priya Sharma"),
                ("specialty", "Neurology"),
                ("institution", "Fortis Healthcare"),
                ("location", "Mumbai"),
                ("email", "priya.sharma@fortis.com"),
                ("tier", "A"),
            ]),
            item(3, &[
                ("name", "Dr. Sneha Reddy"),
                ("specialty", "Oncology"),
                ("institution", "AIIMS"),
                ("location", "Delhi"),
                ("email", "sneha.reddy@aiims.edu"),
                ("tier", "B"),
            ]),
        ],
        &[
            SeedVersion { added: 2, rationale: "Initial import" },
            SeedVersion { added: 1, rationale: "Bulk upload" },
        ],
    );

    builder.push(
        0x1002,
        DomainKey::Account,
        "Formulary Decision-Maker Lists",
        "North Zone Formulary Committee",
        ("Vikram Rao", "Key Account Manager"),
        vec![
            item(4, &[
                ("name", "Dr. Meera Iyer"),
                ("institution", "Max Healthcare"),
                ("designation", "Pharmacy & Therapeutics Chair"),
                ("influence_level", "High"),
            ]),
            item(5, &[
                ("name", "Mr. Sanjay Gupta"),
                ("institution", "Medanta"),
                ("designation", "Procurement Head"),
                ("influence_level", "Medium"),
            ]),
        ],
        &[SeedVersion { added: 2, rationale: "Initial import" }],
    );

    builder.push(
        0x1003,
        DomainKey::Marketing,
        "Event Invitation Lists",
        "Cardio Summit 2025 Invitations",
        ("Neha Kapoor", "Marketing Lead"),
        vec![
            item(6, &[
                ("name", "Dr. Amit Patel"),
                ("specialty", "Orthopedics"),
                ("institution", "Max Hospital"),
                ("email", "amit.patel@max.com"),
            ]),
            item(7, &[
                ("name", "Dr. Vikram Singh"),
                ("specialty", "Gastroenterology"),
                ("institution", "Medanta"),
                ("email", "vikram.singh@medanta.com"),
            ]),
        ],
        &[SeedVersion { added: 2, rationale: "Initial import" }],
    );

    builder.dataset
}
