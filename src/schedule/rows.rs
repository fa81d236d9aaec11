//! Amortization schedule output structures

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One simulated month. Monetary values are rounded to whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    /// Calendar label, e.g. "Nov 2026"
    pub date: String,
    pub emi: f64,
    pub interest: f64,
    /// Scheduled principal only; prepayments are reported in `extra` and `lumpsum`
    pub principal: f64,
    pub extra: f64,
    pub lumpsum: f64,
    pub balance: f64,
    pub cumulative_interest: f64,
}

/// Complete amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Monthly rows; index = month - 1
    pub rows: Vec<AmortizationRow>,

    /// Whether the balance was retired before the month cap
    pub converged: bool,

    /// Unrounded balance after the last simulated month
    pub final_balance: f64,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            converged: true,
            final_balance: 0.0,
        }
    }

    pub fn add_row(&mut self, row: AmortizationRow) {
        self.rows.push(row);
    }

    /// Number of months until payoff (or until the cap)
    pub fn months(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Total interest paid over the schedule
    pub fn total_interest(&self) -> f64 {
        self.rows.last().map(|r| r.cumulative_interest).unwrap_or(0.0)
    }

    /// Stopped at the month cap with balance still outstanding
    pub fn is_capped(&self) -> bool {
        !self.converged
    }

    /// Row for a 1-indexed schedule month
    pub fn row(&self, month: u32) -> Option<&AmortizationRow> {
        month.checked_sub(1).and_then(|idx| self.rows.get(idx as usize))
    }

    /// Every 12th row plus the final row, for year-by-year views
    pub fn yearly_snapshots(&self) -> Vec<&AmortizationRow> {
        let mut snapshots: Vec<&AmortizationRow> =
            self.rows.iter().filter(|r| r.month % 12 == 0).collect();
        if let Some(last) = self.rows.last() {
            if last.month % 12 != 0 {
                snapshots.push(last);
            }
        }
        snapshots
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            total_months: self.months(),
            total_interest: self.total_interest(),
            total_principal: self.rows.iter().map(|r| r.principal).sum(),
            total_extra: self.rows.iter().map(|r| r.extra).sum(),
            total_lumpsum: self.rows.iter().map(|r| r.lumpsum).sum(),
            final_balance: self.rows.last().map(|r| r.balance).unwrap_or(0.0),
            converged: self.converged,
        }
    }

    /// Write the schedule as CSV to a file
    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }

    /// Write the schedule as CSV, one row per month with a header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_months: u32,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_extra: f64,
    pub total_lumpsum: f64,
    pub final_balance: f64,
    pub converged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: u32, balance: f64, cumulative_interest: f64) -> AmortizationRow {
        AmortizationRow {
            month,
            date: String::new(),
            emi: 100.0,
            interest: 10.0,
            principal: 90.0,
            extra: 0.0,
            lumpsum: 0.0,
            balance,
            cumulative_interest,
        }
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = Schedule::new();
        assert_eq!(schedule.months(), 0);
        assert_eq!(schedule.total_interest(), 0.0);
        assert!(schedule.row(0).is_none());
        assert!(schedule.yearly_snapshots().is_empty());
    }

    #[test]
    fn test_yearly_snapshots_include_last() {
        let mut schedule = Schedule::new();
        for m in 1..=30 {
            schedule.add_row(row(m, 3000.0 - 100.0 * m as f64, 10.0 * m as f64));
        }
        let months: Vec<u32> = schedule.yearly_snapshots().iter().map(|r| r.month).collect();
        assert_eq!(months, vec![12, 24, 30]);
        assert_eq!(schedule.row(30).unwrap().cumulative_interest, 300.0);
        assert_eq!(schedule.total_interest(), 300.0);
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let mut schedule = Schedule::new();
        schedule.add_row(row(1, 900.0, 10.0));
        schedule.add_row(row(2, 800.0, 20.0));

        let mut out = Vec::new();
        schedule.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "month,date,emi,interest,principal,extra,lumpsum,balance,cumulative_interest"
        );
        assert!(lines[2].starts_with("2,"));
    }
}
