//! Ranking several contracts by fairness

use serde::Serialize;

use autolexis_core::{ContractSla, Grade};

use crate::fairness::FairnessEngine;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedContract {
    pub contract_id: String,
    /// 1-based, best first
    pub rank: usize,
    pub score: u8,
    pub grade: Grade,
    pub summary: String,
    pub concerns: Vec<String>,
    pub positives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub rankings: Vec<RankedContract>,
    pub best_contract: Option<RankedContract>,
    pub recommendation: String,
}

/// Score every contract with the default bands and rank them
///
/// Ties keep their input order.
pub fn compare_contracts(contracts: &[(String, ContractSla)]) -> ComparisonReport {
    FairnessEngine::default().compare(contracts)
}

impl FairnessEngine {
    pub fn compare(&self, contracts: &[(String, ContractSla)]) -> ComparisonReport {
        let mut rankings: Vec<RankedContract> = contracts
            .iter()
            .map(|(id, sla)| {
                let fairness = self.score(sla);
                RankedContract {
                    contract_id: id.clone(),
                    rank: 0,
                    score: fairness.score,
                    grade: fairness.grade,
                    summary: fairness.summary,
                    concerns: fairness.reasons,
                    positives: fairness.positives,
                }
            })
            .collect();

        rankings.sort_by(|a, b| b.score.cmp(&a.score));
        for (i, ranked) in rankings.iter_mut().enumerate() {
            ranked.rank = i + 1;
        }

        let best_contract = rankings.first().cloned();
        let recommendation = match &best_contract {
            Some(best) => format!("Contract #{}", best.contract_id),
            None => "No contracts to compare".to_string(),
        };

        ComparisonReport {
            rankings,
            best_contract,
            recommendation,
        }
    }
}
