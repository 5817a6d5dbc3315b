//! Sweep of the selected nodes for one time step.
//!
//! Each entry point builds the analysis context, prepares material
//! data and averaged nodal stresses, evaluates every node and keeps
//! the governing record, which is stored at the end of the sweep.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, info};
use rayon::prelude::*;

use crate::averaging::{self, NodalField, Source};
use crate::context::{
    AnalysisContext, AnalysisKind, Notched, Output, Prestress, PrestressSource, ResultType, Selection, Settings,
    StressState,
};
use crate::error::{FatigueError, Result};
use crate::material::MaterialProperties;
use crate::mean_stress::{alt_mean_stress, fully_reversed_stress, AltMean};
use crate::model::{MaterialDatabase, MeshProvider, NodeCollector, ResultReader};
use crate::multiaxial::{self, Combination};
use crate::notch::apply_notch;
use crate::record::{DamageLevel, ResultRecord, SpectrumDamage, StressResult, SIGMA_CYCLE_PERCENTAGES};
use crate::tensor::{principal_stresses, stress_component};
use crate::tracker::WorstCaseTracker;

/// Where and how a sweep runs.
#[derive(Debug, Clone)]
pub struct EvaluatorOptions {
    /// Directory for the result tables.
    pub working_dir: PathBuf,
    /// Identifies the result in the table file names.
    pub result_id: usize,
    /// Evaluate the nodes on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            result_id: 1,
            parallel: false,
        }
    }
}

pub struct FatigueEvaluator<'a> {
    mesh: &'a dyn MeshProvider,
    reader: &'a dyn ResultReader,
    materials: &'a dyn MaterialDatabase,
    settings: Settings,
    options: EvaluatorOptions,
}

impl<'a> FatigueEvaluator<'a> {
    pub fn new(
        mesh: &'a dyn MeshProvider,
        reader: &'a dyn ResultReader,
        materials: &'a dyn MaterialDatabase,
        settings: Settings,
        options: EvaluatorOptions,
    ) -> FatigueEvaluator<'a> {
        FatigueEvaluator {
            mesh,
            reader,
            materials,
            settings,
            options,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn evaluate_uniaxial_stress(&self, time_step: usize, collector: &mut dyn NodeCollector) -> Result<ResultRecord> {
        self.evaluate(StressState::Uniaxial, Output::Stress, time_step, collector)
    }

    pub fn evaluate_uniaxial_life(&self, time_step: usize, collector: &mut dyn NodeCollector) -> Result<ResultRecord> {
        self.evaluate(StressState::Uniaxial, Output::Life, time_step, collector)
    }

    pub fn evaluate_multiaxial_stress(&self, time_step: usize, collector: &mut dyn NodeCollector) -> Result<ResultRecord> {
        self.evaluate(StressState::Multiaxial, Output::Stress, time_step, collector)
    }

    pub fn evaluate_multiaxial_life(&self, time_step: usize, collector: &mut dyn NodeCollector) -> Result<ResultRecord> {
        self.evaluate(StressState::Multiaxial, Output::Life, time_step, collector)
    }

    /// Evaluate every selected node and return the governing record.
    pub fn evaluate(
        &self,
        stress_state: StressState,
        output: Output,
        time_step: usize,
        collector: &mut dyn NodeCollector,
    ) -> Result<ResultRecord> {
        let context = AnalysisContext::new(&self.settings, stress_state, output)?;
        let table_step = match context.analysis {
            AnalysisKind::Spectrum => self.settings.psd_result_set,
            _ => time_step,
        };
        info!("Reinitializing variables for step {}", table_step);
        let stress_to_pa = self.reader.stress_unit().to_pascal();
        let mut tracker = WorstCaseTracker::new(
            &self.options.working_dir,
            self.options.result_id,
            stress_state,
            context.result_type,
        );

        let (materials, tasks) = self.selected_nodes(&context, stress_to_pa)?;
        let nodes: Vec<usize> = tasks.iter().map(|&(node, _)| node).collect();

        info!("Evaluating stresses for {} nodes", nodes.len());
        let eval = match context.analysis {
            AnalysisKind::Static => averaging::average(self.mesh, self.reader, Source::Stress(time_step), &nodes)?,
            AnalysisKind::Harmonic => averaging::average(self.mesh, self.reader, Source::Harmonic(time_step), &nodes)?,
            AnalysisKind::Spectrum => {
                averaging::average(self.mesh, self.reader, Source::Psd(self.settings.psd_result_set), &nodes)?
            }
        };
        let prestress = match (context.analysis, self.settings.prestress) {
            (AnalysisKind::Static, PrestressSource::Time(set)) => {
                Some(averaging::average(self.mesh, self.reader, Source::Stress(set), &nodes)?)
            }
            _ => None,
        };
        let combination = match stress_state {
            StressState::Multiaxial => Some(Combination::from_settings(&self.settings)?),
            StressState::Uniaxial => None,
        };

        let sweep = Sweep {
            context,
            settings: &self.settings,
            stress_to_pa,
            eval,
            prestress,
            combination,
        };

        let records: Vec<Result<ResultRecord>> = if self.options.parallel {
            tasks
                .par_iter()
                .map(|&(node, material)| sweep.node_record(node, &materials[material]))
                .collect()
        } else {
            tasks
                .iter()
                .map(|&(node, material)| sweep.node_record(node, &materials[material]))
                .collect()
        };

        for (&(node, _), record) in tasks.iter().zip(records) {
            let record = record?;
            collector.set_value(node, record.node_value(stress_to_pa));
            if tracker.update(record) {
                debug!("node {} governs with {} {}", node, record.key_name(), record.comparison_key());
            }
        }

        info!("Finished evaluation of step {}", table_step);
        tracker.store(table_step)?;
        Ok(*tracker.worst())
    }

    /// Resolved materials and the (node, material index) pairs to evaluate.
    fn selected_nodes(
        &self,
        context: &AnalysisContext,
        stress_to_pa: f64,
    ) -> Result<(Vec<MaterialProperties>, Vec<(usize, usize)>)> {
        if self.settings.geometry.is_empty() {
            return Err(FatigueError::Config("no geometry selected".to_string()));
        }

        let mut materials: Vec<MaterialProperties> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        let mut tasks = Vec::new();

        for &ref_id in &self.settings.geometry {
            let name = self.mesh.material_of(context.selection, ref_id)?;
            let known = index.get(&name).copied();
            let material = match known {
                Some(i) => i,
                None => {
                    let props = MaterialProperties::resolve(self.materials, &name, &self.settings, context, stress_to_pa)?;
                    materials.push(props);
                    index.insert(name, materials.len() - 1);
                    materials.len() - 1
                }
            };
            let nodes = match context.selection {
                Selection::GeometricEntity => self.mesh.region_nodes(ref_id)?,
                Selection::Node => vec![ref_id],
            };
            tasks.extend(nodes.into_iter().map(|node| (node, material)));
        }
        Ok((materials, tasks))
    }
}

/// Read-only state shared by the node evaluations of a sweep.
struct Sweep<'s> {
    context: AnalysisContext,
    settings: &'s Settings,
    stress_to_pa: f64,
    eval: NodalField,
    prestress: Option<NodalField>,
    combination: Option<Combination>,
}

impl<'s> Sweep<'s> {
    fn node_record(&self, node: usize, props: &MaterialProperties) -> Result<ResultRecord> {
        match self.context.stress_state {
            StressState::Uniaxial => self.uniaxial_record(node, props),
            StressState::Multiaxial => self.multiaxial_record(node, props),
        }
    }

    fn uniaxial_record(&self, node: usize, props: &MaterialProperties) -> Result<ResultRecord> {
        let result_type = self.context.result_type;

        if self.context.analysis == AnalysisKind::Spectrum {
            let psd = self.eval.scalar(node)?;
            let prestress = self.settings.prestress_value();
            if result_type == ResultType::DamageRandom {
                return self.spectrum_damage(psd, prestress, props).map(ResultRecord::SpectrumDamage);
            }
            let (mut stress, mut fully_reversed) = self.uniaxial_cycle(psd, prestress, props)?;
            stress.alternating *= self.settings.scale_factor;
            fully_reversed *= self.settings.scale_factor;
            let mut result = StressResult::new(result_type, stress, fully_reversed);
            self.add_life(&mut result, props)?;
            return Ok(ResultRecord::Uniaxial(result));
        }

        let component = self.settings.stress_component;
        let principals = principal_stresses(&self.eval.tensor(node)?)?;
        let max_stress = stress_component(component, &principals);
        let prestress = match (self.context.prestress, &self.prestress) {
            (Prestress::Yes, Some(field)) => stress_component(component, &principal_stresses(&field.tensor(node)?)?),
            (Prestress::Yes, None) => self.settings.prestress_value(),
            (Prestress::No, _) => 0.0,
        };

        let (stress, fully_reversed) = self.uniaxial_cycle(max_stress, prestress, props)?;
        let mut result = StressResult::new(result_type, stress, fully_reversed);
        self.add_life(&mut result, props)?;
        Ok(ResultRecord::Uniaxial(result))
    }

    /// Alternating and mean stress after notch correction, and the
    /// fully-reversed stress.
    fn uniaxial_cycle(&self, max_stress: f64, prestress: f64, props: &MaterialProperties) -> Result<(AltMean, f64)> {
        let mut stress = alt_mean_stress(max_stress, prestress, self.context.load_history);
        if self.context.notched == Notched::Notched {
            let kt = self.notch_kt()?[0];
            stress = apply_notch(stress, notch_q(props)?, kt);
        }
        let theory = self.settings.mean_stress_theory()?;
        let fully_reversed = fully_reversed_stress(theory, stress.alternating, stress.mean, props.ftu);
        Ok((stress, fully_reversed))
    }

    fn notch_kt(&self) -> Result<[f64; 3]> {
        match &self.settings.notch {
            Some(notch) => match self.context.stress_state {
                StressState::Uniaxial => Ok([notch.kt; 3]),
                StressState::Multiaxial => Ok(notch.kt_principal),
            },
            None => Err(FatigueError::Config("notched analysis without notch settings".to_string())),
        }
    }

    fn spectrum_damage(&self, psd: f64, prestress: f64, props: &MaterialProperties) -> Result<SpectrumDamage> {
        let curve = props.curve()?;
        let test_cycles = self.settings.applied_cycles(self.context.analysis)?;

        let mut damage = SpectrumDamage::default();
        for (i, level) in damage.levels.iter_mut().enumerate() {
            let sigma = (i + 1) as f64;
            let (stress, fully_reversed) = self.uniaxial_cycle(sigma * psd, prestress, props)?;
            let cycle_percentage = SIGMA_CYCLE_PERCENTAGES[i];
            let applied_cycles = test_cycles * cycle_percentage / 100.0;
            let cycles_to_failure = curve.cycles_to_failure(fully_reversed * self.stress_to_pa);
            *level = DamageLevel {
                alternating: stress.alternating,
                mean: stress.mean,
                fully_reversed,
                cycle_percentage,
                applied_cycles,
                cycles_to_failure,
                damage: applied_cycles / cycles_to_failure,
            };
        }
        damage.miner_sum = damage.levels.iter().map(|l| l.damage).sum();
        Ok(damage)
    }

    fn multiaxial_record(&self, node: usize, props: &MaterialProperties) -> Result<ResultRecord> {
        let combination = self
            .combination
            .ok_or_else(|| FatigueError::Config("no multiaxial stress theory selected".to_string()))?;
        let principals = principal_stresses(&self.eval.tensor(node)?)?;

        let matched = match (self.context.prestress, &self.prestress) {
            (Prestress::Yes, Some(field)) => {
                let reference = principal_stresses(&field.tensor(node)?)?;
                let perm = multiaxial::match_prestress_axes(&principals, &reference);
                [reference[perm[0]], reference[perm[1]], reference[perm[2]]]
            }
            (Prestress::Yes, None) => [self.settings.prestress_value(); 3],
            (Prestress::No, _) => [0.0; 3],
        };

        let mut axes = multiaxial::axis_stresses(&principals, &matched, self.context.load_history);
        if self.context.notched == Notched::Notched {
            let q = notch_q(props)?;
            let kt = self.notch_kt()?;
            for (axis, kt) in axes.iter_mut().zip(kt.iter()) {
                *axis = apply_notch(*axis, q, *kt);
            }
        }

        let equivalent = multiaxial::combine(combination, &axes, props.ftu);
        let mut combined = StressResult::new(
            self.context.result_type,
            AltMean {
                alternating: equivalent.alternating,
                mean: equivalent.mean,
            },
            equivalent.fully_reversed,
        );
        self.add_life(&mut combined, props)?;
        Ok(ResultRecord::Multiaxial { axes, combined })
    }

    fn add_life(&self, result: &mut StressResult, props: &MaterialProperties) -> Result<()> {
        if self.context.output == Output::Stress {
            return Ok(());
        }
        let curve = props.curve()?;
        result.cycles_to_failure = curve.cycles_to_failure(result.fully_reversed * self.stress_to_pa);

        if result.result_type.is_damage() {
            let applied = self.settings.applied_cycles(self.context.analysis)?;
            result.applied_cycles = applied;
            result.miner_sum = applied / result.cycles_to_failure;
            result.allowable_stress = curve.allowable_stress(applied) / self.stress_to_pa;
        }
        Ok(())
    }
}

fn notch_q(props: &MaterialProperties) -> Result<f64> {
    props
        .notch_sensitivity
        .ok_or_else(|| FatigueError::Material(format!("no notch sensitivity resolved for '{}'", props.name)))
}
