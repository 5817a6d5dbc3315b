//! Worst-case node of a sweep and its persisted result table.
//!
//! A tracker keeps the record with the largest comparison key seen in
//! one sweep. At the end of the sweep the record is written to a table
//! in the working directory, one block of rows per time step.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::context::{ResultType, StressState};
use crate::error::{FatigueError, Result};
use crate::mean_stress::AltMean;
use crate::record::{ResultRecord, SpectrumDamage, StressResult};

pub struct WorstCaseTracker {
    path: PathBuf,
    result_type: ResultType,
    worst: ResultRecord,
}

impl WorstCaseTracker {
    /// Tracker for a sweep writing into `dir`, starting from a
    /// placeholder record that any evaluated node replaces.
    pub fn new(dir: &Path, result_id: usize, stress_state: StressState, result_type: ResultType) -> WorstCaseTracker {
        let worst = match (stress_state, result_type) {
            (StressState::Uniaxial, ResultType::DamageRandom) => ResultRecord::SpectrumDamage(SpectrumDamage::initial()),
            (StressState::Uniaxial, _) => ResultRecord::Uniaxial(StressResult::initial(result_type, -1.0)),
            (StressState::Multiaxial, _) => ResultRecord::Multiaxial {
                axes: [AltMean::default(); 3],
                combined: StressResult::initial(result_type, 0.0),
            },
        };
        let path = dir.join(WorstCaseTracker::file_name(stress_state, result_type, result_id));
        debug!("tracking worst case into {}", path.display());
        WorstCaseTracker {
            path,
            result_type,
            worst,
        }
    }

    pub fn file_name(stress_state: StressState, result_type: ResultType, result_id: usize) -> String {
        format!("{} {} Result {}.csv", stress_state.text(), result_type.text(), result_id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn worst(&self) -> &ResultRecord {
        &self.worst
    }

    /// Keep the candidate if it is strictly worse than the stored record.
    pub fn update(&mut self, candidate: ResultRecord) -> bool {
        if candidate.comparison_key() > self.worst.comparison_key() {
            self.worst = candidate;
            true
        } else {
            false
        }
    }

    /// Write the worst record for a time step.
    ///
    /// Returns false when the table already holds the time step.
    /// Spectrum damage tables hold a single record and are replaced
    /// whole when a new time step is stored.
    pub fn store(&self, time_step: usize) -> Result<bool> {
        let exists = self.path.exists();
        if exists && self.has_time_step(time_step)? {
            info!("{} already holds time step {}", self.path.display(), time_step);
            return Ok(false);
        }

        if let ResultRecord::SpectrumDamage(damage) = &self.worst {
            let text = format!("{}\n{}", self.result_type.text(), spectrum_rows(damage, time_step));
            fs::write(&self.path, text)?;
            info!("stored time step {} in {}", time_step, self.path.display());
            return Ok(true);
        }

        let mut text = String::new();
        if !exists {
            text.push_str(&format!("{}\n{}\n", self.result_type.text(), self.header()));
        }
        text.push_str(&self.rows(time_step));

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(text.as_bytes())?;
        info!("stored time step {} in {}", time_step, self.path.display());
        Ok(true)
    }

    /// Spectrum tables name their time step in a `Time Step` row, the
    /// other layouts in the first column of every row.
    fn has_time_step(&self, time_step: usize) -> Result<bool> {
        let spectrum = matches!(self.worst, ResultRecord::SpectrumDamage(_));
        let reader = BufReader::new(File::open(&self.path)?);
        for line in reader.lines() {
            let line = line?;
            let mut cells = line.split(',').map(str::trim);
            let first = cells.next().unwrap_or("");
            let step = if !spectrum {
                Some(first)
            } else if first == TIME_STEP {
                cells.next()
            } else {
                None
            };
            if step.and_then(|s| s.parse::<usize>().ok()) == Some(time_step) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn header(&self) -> String {
        match &self.worst {
            ResultRecord::Uniaxial(result) => {
                let names: Vec<&str> = result.fields().iter().map(|f| f.0).collect();
                format!("{},{}", TIME_STEP, names.join(","))
            }
            ResultRecord::Multiaxial { .. } => {
                format!("{},Principal Axis,Alternating Stress,Mean Stress", TIME_STEP)
            }
            ResultRecord::SpectrumDamage(_) => SPECTRUM_HEADER.to_string(),
        }
    }

    fn rows(&self, time_step: usize) -> String {
        match &self.worst {
            ResultRecord::Uniaxial(result) => {
                let values: Vec<String> = result.fields().iter().map(|f| f.1.to_string()).collect();
                format!("{},{}\n", time_step, values.join(","))
            }
            ResultRecord::Multiaxial { axes, combined } => {
                let axis_rows = axes
                    .iter()
                    .enumerate()
                    .map(|(i, axis)| format!("{},{},{},{}\n", time_step, i + 1, axis.alternating, axis.mean));
                let field_rows = combined
                    .effective_fields()
                    .into_iter()
                    .map(|(name, value)| format!("{},{}, ,{}\n", time_step, name, value));
                axis_rows.chain(field_rows).collect()
            }
            ResultRecord::SpectrumDamage(damage) => spectrum_rows(damage, time_step),
        }
    }
}

const TIME_STEP: &str = "Time Step";

const SPECTRUM_HEADER: &str = "Stress Level,Alternating Stress,Mean Stress,Fully-Reversed Stress,\
Cycle Percentage,Applied Cycles,Cycles to Failure,Damage";

fn spectrum_rows(damage: &SpectrumDamage, time_step: usize) -> String {
    let mut text = format!("{}\n", SPECTRUM_HEADER);
    for (i, level) in damage.levels.iter().enumerate() {
        text.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            i + 1,
            level.alternating,
            level.mean,
            level.fully_reversed,
            level.cycle_percentage,
            level.applied_cycles,
            level.cycles_to_failure,
            level.damage
        ));
    }
    text.push_str(&format!("Miner Sum,{}\n", damage.miner_sum));
    text.push_str(&format!("{},{}\n", TIME_STEP, time_step));
    text
}

/// A persisted result table read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    /// Result type title from the first line.
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn load(path: &Path) -> Result<ResultTable> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = reader.lines();

        let title = lines
            .next()
            .transpose()?
            .ok_or_else(|| FatigueError::Results(format!("{} is empty", path.display())))?;
        let header = lines
            .next()
            .transpose()?
            .ok_or_else(|| FatigueError::Results(format!("{} has no header", path.display())))?;

        let mut rows = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(split_row(&line));
        }

        Ok(ResultTable {
            title: title.trim().to_string(),
            header: split_row(&header),
            rows,
        })
    }

    /// Distinct time steps in the order they were stored.
    ///
    /// A spectrum table names its single time step in a `Time Step` row.
    pub fn time_steps(&self) -> Vec<usize> {
        if let Some(row) = self.rows.iter().find(|row| row.first().map(String::as_str) == Some(TIME_STEP)) {
            return row.get(1).and_then(|c| c.parse::<usize>().ok()).into_iter().collect();
        }
        let mut steps: Vec<usize> = Vec::new();
        for row in &self.rows {
            if let Some(step) = row.first().and_then(|c| c.parse::<usize>().ok()) {
                if !steps.contains(&step) {
                    steps.push(step);
                }
            }
        }
        steps
    }

    /// Value of a named column (uniaxial layout) or of a named field row
    /// (multiaxial layout) for a time step.
    pub fn value(&self, time_step: usize, name: &str) -> Option<f64> {
        let step = time_step.to_string();
        let rows = self.rows.iter().filter(|row| row.first() == Some(&step));

        if let Some(column) = self.header.iter().position(|h| h == name) {
            return rows.filter_map(|row| row.get(column)?.parse().ok()).next();
        }
        rows.filter(|row| row.get(1).map(String::as_str) == Some(name))
            .filter_map(|row| row.get(3)?.trim().parse().ok())
            .next()
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(|c| c.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn uniaxial(fully_reversed: f64) -> ResultRecord {
        ResultRecord::Uniaxial(StressResult::new(
            ResultType::Stress,
            AltMean {
                alternating: fully_reversed,
                mean: 0.0,
            },
            fully_reversed,
        ))
    }

    #[test]
    fn file_names() {
        assert_eq!(
            WorstCaseTracker::file_name(StressState::Uniaxial, ResultType::DamageConstant, 12),
            "Uniaxial Damage - Constant Result 12.csv"
        );
        assert_eq!(
            WorstCaseTracker::file_name(StressState::Multiaxial, ResultType::CyclesToFailure, 3),
            "Multiaxial Cycles to Failure Result 3.csv"
        );
    }

    #[test]
    fn only_strictly_worse_records_replace() {
        let dir = TempDir::new("tracker").unwrap();
        let mut tracker = WorstCaseTracker::new(dir.path(), 1, StressState::Uniaxial, ResultType::Stress);
        assert_eq!(tracker.worst().comparison_key(), -1.0);

        let mut previous = tracker.worst().comparison_key();
        for fr in [10.0, 5.0, 30.0, 30.0, 0.0, 29.0].iter() {
            tracker.update(uniaxial(*fr));
            let key = tracker.worst().comparison_key();
            assert!(key >= previous);
            previous = key;
        }
        assert_eq!(previous, 30.0);
        assert!(!tracker.update(uniaxial(30.0)));
        assert!(tracker.update(uniaxial(30.5)));
    }

    #[test]
    fn zero_stress_replaces_the_uniaxial_placeholder() {
        let dir = TempDir::new("tracker").unwrap();
        let mut tracker = WorstCaseTracker::new(dir.path(), 1, StressState::Uniaxial, ResultType::Stress);
        assert!(tracker.update(uniaxial(0.0)));
    }

    #[test]
    fn storing_a_time_step_twice_writes_it_once() {
        let dir = TempDir::new("tracker").unwrap();
        let mut tracker = WorstCaseTracker::new(dir.path(), 4, StressState::Uniaxial, ResultType::Stress);
        tracker.update(uniaxial(120.0));
        assert!(tracker.store(1).unwrap());
        assert!(!tracker.store(1).unwrap());
        tracker.update(uniaxial(150.0));
        assert!(tracker.store(2).unwrap());

        let table = ResultTable::load(tracker.path()).unwrap();
        assert_eq!(table.title, "Stress");
        assert_eq!(
            table.header,
            vec!["Time Step", "Alternating Stress", "Mean Stress", "Fully-Reversed Stress"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.time_steps(), vec![1, 2]);
        assert_eq!(table.value(1, "Fully-Reversed Stress"), Some(120.0));
        assert_eq!(table.value(2, "Fully-Reversed Stress"), Some(150.0));
    }

    #[test]
    fn multiaxial_layout() {
        let dir = TempDir::new("tracker").unwrap();
        let mut tracker = WorstCaseTracker::new(dir.path(), 2, StressState::Multiaxial, ResultType::CyclesToFailure);
        let mut combined = StressResult::new(
            ResultType::CyclesToFailure,
            AltMean {
                alternating: 40.0,
                mean: 10.0,
            },
            45.0,
        );
        combined.cycles_to_failure = 2.5e5;
        assert!(tracker.update(ResultRecord::Multiaxial {
            axes: [
                AltMean {
                    alternating: 40.0,
                    mean: 10.0
                },
                AltMean::default(),
                AltMean::default()
            ],
            combined,
        }));
        tracker.store(7).unwrap();
        tracker.store(7).unwrap();

        let table = ResultTable::load(tracker.path()).unwrap();
        assert_eq!(table.title, "Cycles to Failure");
        assert_eq!(table.header[1], "Principal Axis");
        assert_eq!(table.rows.len(), 3 + 4);
        assert_eq!(table.rows[0], vec!["7", "1", "40", "10"]);
        assert_eq!(table.value(7, "Fully-Reversed Stress"), Some(45.0));
        assert_eq!(table.value(7, "Cycles to Failure"), Some(2.5e5));
    }

    fn spectrum(miner_sum: f64) -> ResultRecord {
        let mut damage = SpectrumDamage::initial();
        damage.miner_sum = miner_sum;
        ResultRecord::SpectrumDamage(damage)
    }

    #[test]
    fn spectrum_table_keeps_its_time_step() {
        let dir = TempDir::new("tracker").unwrap();
        let mut tracker = WorstCaseTracker::new(dir.path(), 1, StressState::Uniaxial, ResultType::DamageRandom);
        assert!(tracker.update(spectrum(0.2)));
        assert!(tracker.store(2).unwrap());
        let first = fs::read_to_string(tracker.path()).unwrap();

        tracker.update(spectrum(0.3));
        assert!(!tracker.store(2).unwrap());
        assert_eq!(fs::read_to_string(tracker.path()).unwrap(), first);

        let table = ResultTable::load(tracker.path()).unwrap();
        assert_eq!(table.title, "Damage - Random");
        assert_eq!(table.header[0], "Stress Level");
        assert_eq!(table.header.len(), 8);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[1][4], "27.1");
        assert_eq!(table.rows[3], vec!["Miner Sum", "0.2"]);
        assert_eq!(table.rows[4], vec!["Time Step", "2"]);
        assert_eq!(table.time_steps(), vec![2]);
    }

    #[test]
    fn spectrum_table_is_replaced_for_a_new_time_step() {
        let dir = TempDir::new("tracker").unwrap();
        let mut tracker = WorstCaseTracker::new(dir.path(), 1, StressState::Uniaxial, ResultType::DamageRandom);
        tracker.update(spectrum(0.2));
        tracker.store(2).unwrap();
        tracker.update(spectrum(0.3));
        assert!(tracker.store(3).unwrap());

        let table = ResultTable::load(tracker.path()).unwrap();
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[3], vec!["Miner Sum", "0.3"]);
        assert_eq!(table.time_steps(), vec![3]);
    }
}
