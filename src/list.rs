use fatigue::material;
use fatigue::mean_stress::{LoadHistory, MeanStressTheory};
use fatigue::multiaxial::MultiaxialTheory;
use fatigue::notch::{CycleSensitivity, NotchCorrelation};
use fatigue::tensor::StressComponent;
use fatigue::topology::ElementFamily;
use fatigue::units::{LengthUnit, StressUnit};

static HIGHLIGHTS: &str =
"    - Nodal averaging of element stresses, including midside nodes
    - Principal stresses and signed von Mises equivalent stress
    - Mean stress correction (Goodman, Gerber, Smith-Watson-Topper)
    - Multiaxial equivalent stress with prestress axis matching
    - Notch correction with Peterson and Juvinall correlations
    - Cycles to failure and Miner damage for static, harmonic and
      random vibration (PSD) analyses
    - Worst case tracking across time steps written to csv tables
";

static UNITS: &str =
"Element stresses stay in the stress unit named in the job file, and so do
prestress values and the stresses of the result tables. S-N data and strengths
of the material database are in Pa. Strengths are converted to the model unit
and stresses are converted to Pa only for the S-N lookup. Node stress values
handed to the collector are in Pa. Notch radii are given in the length unit of
the settings and converted to inches for the notch sensitivity correlations.
";

/// Prints out lists of data. Sort of an extended help.
pub fn print_list() {
    let fields = [
        ("Alternating Stress", "stress amplitude of the load cycle (model stress unit)"),
        ("Mean Stress", "mean stress of the load cycle (model stress unit)"),
        ("Fully-Reversed Stress", "alternating stress after mean stress correction (model stress unit)"),
        ("Allowable Stress", "fully-reversed stress allowed for the applied cycles (model stress unit)"),
        ("Cycles to Failure", "life from the S-N curve at the fully-reversed stress"),
        ("Applied Cycles", "cycles the node sees"),
        ("Miner Sum", "applied cycles divided by cycles to failure"),
    ];

    let formats = [
        (
            "Job files",
"A job is a single JSON file holding the mesh, the element stress results,
any extra materials and the analysis settings:

{
  \"stress_unit\": \"MPa\",
  \"elements\": [{\"id\": 1, \"family\": \"tri3\", \"nodes\": [1, 2, 3]}, ...],
  \"regions\": {\"10\": {\"nodes\": [1, 2, 3], \"material\": \"structural-steel\"}},
  \"node_materials\": {\"4\": \"aluminum-alloy\"},
  \"default_material\": \"structural-steel\",
  \"results\": [{\"set\": 1, \"element\": 1, \"values\": [...]}, ...],
  \"materials\": {\"my-steel\": {...}},
  \"settings\": {...}
}

Result values are six tensor components (xx yy zz xy yz xz) for every node of
the element in element order. Blocks with \"quantity\": \"stress_psd\" hold a
single PSD value per node. Harmonic results store the real part in set s and
the imaginary part in set s + 1.
",
        ),
        (
            "Settings",
"analysis            Static | Harmonic | Spectrum
selection           Node | Geometric Entity
geometry            node ids or region ids
stress_component    see Stress Components
mean_stress_theory  see Mean Stress Theories
multiaxial_theory   see Multiaxial Theories
sines_constant      required for the Sines theory
load_history        Fully-Reversed | Half-Reversed
prestress_time      result set of the prestress (static only)
prestress_value     constant prestress in model stress units (harmonic and spectrum)
notch               {kt, kt_principal, radius, correlation, cycle_correlation}
life_measure        Cycles to Failure | Miner Sum
scatter_stress, scatter_life, temperature_factor, misc_factor
cycles              applied cycles for damage
test_hours, test_frequency   vibration test duration for random damage
scale_factor        multiplies spectrum stresses
psd_result_set      result set holding the PSD stresses (default 2)
length_unit         unit of the notch radius
",
        ),
        (
            "Result tables",
"The worst case of every sweep is appended to
\"<state> <result type> Result <id>.csv\" in the working directory. The first
line is the result type and the second the column header. A time step already
in the table is not written again. Multiaxial tables hold one row per
principal axis followed by the combined values. Spectrum damage tables hold
one time step: they end with the Miner sum and a \"Time Step\" row, and are
rewritten whole when a new time step is stored.
",
        ),
    ];

    // Set up a new counter to automatically label the section headers
    let mut header = Counter::new();

    header.section("Program Highlights");
    print!("{}", HIGHLIGHTS);

    header.section("Units");
    print!("{}", UNITS);
    println!();
    let stress_units = [
        StressUnit::Pa,
        StressUnit::KPa,
        StressUnit::MPa,
        StressUnit::GPa,
        StressUnit::Psi,
        StressUnit::Ksi,
    ];
    for unit in &stress_units {
        println!("{:20} {:e} Pa", unit.text(), unit.to_pascal());
    }
    println!();
    let length_units = [
        LengthUnit::Meter,
        LengthUnit::Centimeter,
        LengthUnit::Millimeter,
        LengthUnit::Micrometer,
        LengthUnit::Foot,
        LengthUnit::Inch,
    ];
    for unit in &length_units {
        println!("{:20} {:e} in", unit.text(), unit.to_inch());
    }

    header.section("Output Fields");
    for &(name, descrip) in &fields {
        println!("{:25} {}", name, descrip);
    }

    header.section("Stress Components");
    for component in &StressComponent::ALL {
        println!("{}", component.text());
    }

    header.section("Load Histories");
    for history in &[LoadHistory::FullyReversed, LoadHistory::HalfReversed] {
        println!("{:20} minimum stress {}", history.text(), match history {
            LoadHistory::FullyReversed => "mirrors the maximum about the prestress",
            LoadHistory::HalfReversed => "is the prestress",
        });
    }

    header.section("Mean Stress Theories");
    for theory in &MeanStressTheory::ALL {
        println!("{}", theory.text());
    }

    header.section("Multiaxial Theories");
    for theory in &MultiaxialTheory::ALL {
        println!("{}", theory.text());
    }

    header.section("Notch Correlations");
    for correlation in &NotchCorrelation::ALL {
        println!("{}", correlation.text());
    }
    println!();
    for correlation in &CycleSensitivity::ALL {
        println!("{}", correlation.text());
    }

    header.section("Element Families");
    let families = [
        ElementFamily::Tri3,
        ElementFamily::Quad4,
        ElementFamily::Tet4,
        ElementFamily::Pyramid5,
        ElementFamily::Wedge6,
        ElementFamily::Hex8,
        ElementFamily::Tri6,
        ElementFamily::Quad8,
        ElementFamily::Tet10,
        ElementFamily::Pyramid13,
        ElementFamily::Wedge15,
        ElementFamily::Hex20,
    ];
    println!("{:12} {:>7} {:>7}", "Name", "Nodes", "Corners");
    for family in &families {
        println!("{:12} {:7} {:7}", family.text(), family.node_count(), family.corner_count());
    }

    header.section("Materials");
    println!("{:25} {:>12} {:>12} Ref.", "Name", "Ftu (Pa)", "Fty (Pa)");
    for (name, mat) in material::get_all_materials().iter() {
        println!(
            "{:25} {:12e} {:12e} {}",
            name, mat.ultimate_strength, mat.yield_strength, mat.cite
        );
    }

    header.section("File formats");

    for &(file, form) in &formats {
        header.subsection(file);
        println!("{}", form);
    }

    println!();
}

struct Counter {
    section: usize,
    subsection: usize,
}

impl Counter {
    fn new() -> Counter {
        Counter {
            section: 0,
            subsection: 0,
        }
    }

    // print as a header
    fn section(&mut self, head: &str) {
        self.section += 1;
        self.subsection = 0;
        let header = format!("{}. {}", self.section, head);
        println!("\n{}", header);
        // Underline
        for _ in 0..header.len() {
            print!("=");
        }
        println!("\n");
    }

    fn subsection(&mut self, head: &str) {
        self.subsection += 1;
        let header = format!("{}.{}. {}", self.section, self.subsection, head);
        println!("{}", header);
        // Underline
        for _ in 0..header.len() {
            print!("-");
        }
        println!("\n");
    }
}
