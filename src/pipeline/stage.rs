use serde::{Deserialize, Serialize};

use crate::types::Operation;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stage {
    Security = 0,    // Access decision for the actor
    Preparation = 1, // System/read-only/unknown fields, before_validate hooks, defaults
    Enrichment = 2,  // before_change hooks (tenant stamping)
    Validation = 3,  // Required fields, field kinds, select options
}

impl Stage {
    /// Stages that apply to an operation
    pub fn for_operation(operation: Operation) -> Vec<Self> {
        use Stage::*;

        match operation {
            Operation::Read | Operation::Delete => vec![Security],
            Operation::Create | Operation::Update => vec![Security, Preparation, Enrichment, Validation],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_run_every_stage_in_order() {
        let stages = Stage::for_operation(Operation::Update);
        assert_eq!(stages, vec![Stage::Security, Stage::Preparation, Stage::Enrichment, Stage::Validation]);
        assert!(stages.windows(2).all(|w| (w[0] as u8) < (w[1] as u8)));
    }

    #[test]
    fn reads_only_check_access() {
        assert_eq!(Stage::for_operation(Operation::Read), vec![Stage::Security]);
        assert_eq!(Stage::for_operation(Operation::Delete), vec![Stage::Security]);
    }
}
