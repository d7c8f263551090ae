// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::RecurrenceKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: &'static str,
    pub detail: String,
}

fn issue(code: &'static str, detail: String) -> Issue {
    Issue { code, detail }
}

/// Cross-checks records that describe the same fact in two places.
pub fn audit(ledger: &Ledger) -> Vec<Issue> {
    let mut out = Vec::new();

    for r in &ledger.recurring {
        if r.kind != RecurrenceKind::Installment {
            continue;
        }
        let Some(count) = r.installment_count else {
            out.push(issue("installment_plan_without_count", format!("#{} {}", r.id, r.description)));
            continue;
        };
        if r.installments_paid > count {
            out.push(issue(
                "counter_above_count",
                format!("#{} {}: {}/{}", r.id, r.description, r.installments_paid, count),
            ));
        }
        if r.is_exhausted() && r.active {
            out.push(issue("exhausted_but_active", format!("#{} {}", r.id, r.description)));
        }
        // Paying installments out of order leaves the counter behind the
        // records; a partial payment moves it ahead, which is fine.
        let mut run = 0;
        while ledger.expenses.iter().any(|e| {
            e.recurring_id == Some(r.id) && e.installment_index() == Some(run + 1) && e.paid
        }) {
            run += 1;
        }
        if run > r.installments_paid {
            out.push(issue(
                "counter_behind",
                format!(
                    "#{} {}: counter {} but {} paid in sequence",
                    r.id, r.description, r.installments_paid, run
                ),
            ));
        }
    }

    for e in &ledger.expenses {
        if let Some(id) = e.recurring_id {
            if ledger.recurring(id).is_none() {
                out.push(issue("orphan_recurring_link", format!("expense #{} -> #{}", e.id, id)));
            }
        }
        if let Some(id) = e.purchase_id {
            if ledger.purchase(id).is_none() {
                out.push(issue("orphan_purchase_link", format!("expense #{} -> #{}", e.id, id)));
            }
        }
        if let Some(id) = e.card_id {
            if ledger.card(id).is_none() {
                out.push(issue("orphan_card_link", format!("expense #{} -> #{}", e.id, id)));
            }
        }
        if let Some(inst) = e.installment {
            if inst.index == 0 || inst.index > inst.count {
                out.push(issue("installment_out_of_range", format!("expense #{} {}", e.id, inst)));
            }
        }
        if let Some(name) = e.payer.person() {
            if !ledger.has_person(name) {
                out.push(issue("unknown_payer", format!("expense #{} {}", e.id, name)));
            }
        }
    }

    for r in &ledger.recurring {
        if let Some(name) = r.payer.person() {
            if !ledger.has_person(name) {
                out.push(issue("unknown_payer", format!("recurring #{} {}", r.id, name)));
            }
        }
    }

    for p in &ledger.purchases {
        if ledger.card(p.card_id).is_none() {
            out.push(issue("purchase_without_card", format!("#{} {}", p.id, p.description)));
        }
    }
    out
}
