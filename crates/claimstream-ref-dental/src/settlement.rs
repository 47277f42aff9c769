//! Settlement (EOB) summary for a decided claim.
//!
//! Output only: nothing here pays, notifies or mails anyone. The summary is
//! derived from the final snapshot plus the member's contact record.

use std::fmt;

use serde::Serialize;

use claimstream_contracts::{
    claim::ClaimStatus,
    review::{ReviewSnapshot, ReviewStep},
};

use crate::mock_data;

/// What happens downstream once a claim is decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementSummary {
    Approved {
        claim_id: String,
        payment_amount: u64,
        payee: String,
        member_name: String,
        /// `None` when the PAS did not report a benefit balance.
        remaining_benefits: Option<u64>,
        eob_recipient: String,
    },
    Denied {
        claim_id: String,
        member_name: String,
        provider_name: String,
    },
}

/// Build the settlement summary for `snapshot`.
///
/// Returns `None` unless the session is DECIDED.
pub fn summarize(snapshot: &ReviewSnapshot) -> Option<SettlementSummary> {
    if snapshot.step != ReviewStep::Decided {
        return None;
    }
    let claim = snapshot.claim.as_ref()?;

    match claim.status {
        ClaimStatus::Approved => {
            let record = snapshot.verification.as_ref()?;
            let member = mock_data::get_member_record(&claim.member_id);
            Some(SettlementSummary::Approved {
                claim_id: claim.claim_id.to_string(),
                payment_amount: record.benefit_calculation.covered_amount,
                payee: claim.provider_name.clone(),
                member_name: claim.member_name.clone(),
                remaining_benefits: record.remaining_benefit(),
                eob_recipient: member["email"].as_str().unwrap_or_default().to_string(),
            })
        }
        ClaimStatus::Denied => Some(SettlementSummary::Denied {
            claim_id: claim.claim_id.to_string(),
            member_name: claim.member_name.clone(),
            provider_name: claim.provider_name.clone(),
        }),
        ClaimStatus::Pending => None,
    }
}

/// Format whole dollars with thousands separators, e.g. `$1,200`.
pub fn usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for SettlementSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementSummary::Approved {
                claim_id,
                payment_amount,
                payee,
                member_name,
                remaining_benefits,
                eob_recipient,
            } => {
                writeln!(f, "Claim {} approved.", claim_id)?;
                writeln!(
                    f,
                    "- Payment of {} will be processed to {} within 24 hours",
                    usd(*payment_amount),
                    payee
                )?;
                match remaining_benefits {
                    Some(balance) => {
                        writeln!(f, "- {}'s remaining benefits: {}", member_name, usd(*balance))?
                    }
                    None => writeln!(f, "- {}'s remaining benefits: unavailable", member_name)?,
                }
                write!(f, "- EOB sent to: {}", eob_recipient)
            }
            SettlementSummary::Denied {
                claim_id,
                member_name,
                provider_name,
            } => write!(
                f,
                "Claim {} denied. Notification sent to member ({}) and provider ({}).",
                claim_id, member_name, provider_name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_groups_thousands() {
        assert_eq!(usd(0), "$0");
        assert_eq!(usd(960), "$960");
        assert_eq!(usd(1200), "$1,200");
        assert_eq!(usd(1234567), "$1,234,567");
    }

    #[test]
    fn test_denied_summary_names_both_parties() {
        let summary = SettlementSummary::Denied {
            claim_id: "CLM002".to_string(),
            member_name: "Marcus Lee".to_string(),
            provider_name: "Bright Smile Dental".to_string(),
        };
        let text = summary.to_string();
        assert!(text.contains("member (Marcus Lee)"));
        assert!(text.contains("provider (Bright Smile Dental)"));
    }
}
