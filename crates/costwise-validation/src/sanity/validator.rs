//! Resource-count-aware cross-check against billing ground truth.

use costwise_core::constants::{MULTI_RESOURCE_SPEND_CAP, SPEND_INVALIDATION_MULTIPLE};
use costwise_core::errors::ValidationError;
use costwise_core::types::{BillingSnapshot, Finding};

use super::formulas::authoritative_savings;
use crate::pricing::table::VerifiedPriceTable;

/// What the validator did to a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityOutcome {
    pub passed: bool,
    pub correction_applied: bool,
    /// No spend entry for the finding's service; nothing was checked.
    pub skipped: bool,
}

impl SanityOutcome {
    fn skipped() -> Self {
        Self {
            passed: true,
            correction_applied: false,
            skipped: true,
        }
    }
}

/// Validates claimed savings against per-service spend totals.
pub struct SanityValidator<'a> {
    table: &'a VerifiedPriceTable,
}

impl<'a> SanityValidator<'a> {
    pub fn new(table: &'a VerifiedPriceTable) -> Self {
        Self { table }
    }

    /// Cap policy: the fraction of service spend one finding may claim,
    /// by how many resources the service contains. A service with one
    /// or two resources can legitimately have a single finding worth
    /// its entire spend.
    pub fn cap_fraction(resource_count: u32) -> f64 {
        if resource_count <= 2 {
            1.0
        } else {
            MULTI_RESOURCE_SPEND_CAP
        }
    }

    /// Validate one finding in place.
    ///
    /// Claims within the cap pass untouched. Claims above the cap but
    /// within 110% of spend are capped. Claims beyond 110% are invalid:
    /// the savings are recomputed from the category's authoritative
    /// formula, falling back to the cap when the formula's inputs are
    /// missing. An `Err` means even the recomputed figure breaks the
    /// invariant; the finding is dead but the batch continues.
    pub fn validate(
        &self,
        finding: &mut Finding,
        billing: &BillingSnapshot,
    ) -> Result<SanityOutcome, ValidationError> {
        let Some(spend) = billing.spend_for(&finding.service) else {
            tracing::debug!(
                check_id = %finding.check_id,
                service = %finding.service,
                "no billing entry for service, sanity check skipped"
            );
            return Ok(SanityOutcome::skipped());
        };
        let spend_total = spend.monthly_spend;
        let resource_count = billing.resource_count(&finding.service);
        let cap_fraction = Self::cap_fraction(resource_count);
        let cap = spend_total * cap_fraction;

        let claimed = finding.monthly_savings;

        if claimed <= cap {
            return Ok(SanityOutcome {
                passed: true,
                correction_applied: false,
                skipped: false,
            });
        }

        if claimed > spend_total * SPEND_INVALIDATION_MULTIPLE {
            // Wildly wrong claim: the figure itself is untrustworthy,
            // recompute instead of capping.
            tracing::warn!(
                check_id = %finding.check_id,
                claimed,
                spend = spend_total,
                "claimed savings exceed 110% of service spend, recomputing"
            );
            let recomputed = authoritative_savings(finding, self.table);
            let (corrected, calculation) = match recomputed {
                Some(pair) => pair,
                None => {
                    // Formula inputs missing: the cap is the best
                    // defensible figure available.
                    finding.apply_correction(
                        cap,
                        format!(
                            "claimed ${claimed:.2} exceeds service spend ${spend_total:.2}, \
                             capped at {:.0}% (no recomputation inputs)",
                            cap_fraction * 100.0
                        ),
                    );
                    finding.requires_validation = true;
                    return Ok(SanityOutcome {
                        passed: false,
                        correction_applied: true,
                        skipped: false,
                    });
                }
            };

            if corrected > spend_total * SPEND_INVALIDATION_MULTIPLE {
                return Err(ValidationError::InvariantViolation {
                    check_id: finding.check_id.clone(),
                    resource_id: finding.resource_id.clone(),
                    service: finding.service.clone(),
                    claimed: corrected,
                    service_spend: spend_total,
                });
            }

            let corrected = corrected.min(cap);
            finding.apply_correction(
                corrected,
                format!(
                    "claimed ${claimed:.2} exceeds service spend ${spend_total:.2}, \
                     recomputed from {}",
                    calculation.formula
                ),
            );
            finding.calculation = Some(calculation);
            finding.requires_validation = true;
            return Ok(SanityOutcome {
                passed: false,
                correction_applied: true,
                skipped: false,
            });
        }

        // Over the cap but within 110% of spend: plausible, just capped.
        finding.apply_correction(
            cap,
            format!(
                "capped at {:.0}% of ${spend_total:.2} service spend ({resource_count} resources)",
                cap_fraction * 100.0
            ),
        );
        if resource_count >= 3 {
            finding.requires_validation = true;
        }
        Ok(SanityOutcome {
            passed: false,
            correction_applied: true,
            skipped: false,
        })
    }
}
