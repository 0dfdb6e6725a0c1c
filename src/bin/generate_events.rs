use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use trijet_mass::data::model::{COLUMN_NAMES, Column};

/// Write a synthetic single-lepton event sample as Parquet.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of events to generate.
    #[arg(short, long, default_value_t = 10_000)]
    events: usize,

    /// Seed of the generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output file.
    #[arg(default_value = "sample_events.parquet")]
    output: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Integer in `lo..=hi`.
    fn count(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Falling transverse-momentum spectrum above `min`.
    fn pt(&mut self, min: f64, scale: f64) -> f64 {
        min - scale * self.next_f64().max(1e-15).ln()
    }
}

/// Columns in [`COLUMN_NAMES`] order.
fn generate(rng: &mut SimpleRng, n_events: usize) -> Vec<Column> {
    let mut columns: Vec<Column> = vec![Vec::with_capacity(n_events); COLUMN_NAMES.len()];

    for _ in 0..n_events {
        let electrons: Vec<f64> = (0..rng.count(0, 2)).map(|_| rng.pt(5.0, 20.0)).collect();
        let muons: Vec<f64> = (0..rng.count(0, 2)).map(|_| rng.pt(5.0, 20.0)).collect();

        let n_jets = rng.count(2, 9);
        let mut jets: [Vec<f64>; 6] = Default::default();
        for _ in 0..n_jets {
            let pt = rng.pt(15.0, 35.0);
            let eta = rng.gauss(0.0, 1.4);
            let phi = rng.uniform(-std::f64::consts::PI, std::f64::consts::PI);
            let mass = rng.uniform(4.0, 20.0);
            let btag = if rng.next_f64() < 0.3 {
                rng.uniform(0.5, 1.0)
            } else {
                rng.uniform(0.0, 0.5)
            };

            let px = pt * phi.cos();
            let py = pt * phi.sin();
            let pz = pt * eta.sinh();
            let e = (px * px + py * py + pz * pz + mass * mass).sqrt();

            for (field, value) in jets.iter_mut().zip([pt, btag, px, py, pz, e]) {
                field.push(value);
            }
        }

        columns[0].push(electrons);
        columns[1].push(muons);
        for (column, values) in columns[2..].iter_mut().zip(jets) {
            column.push(values);
        }
    }
    columns
}

fn list_array(rows: &[Vec<f64>]) -> ArrayRef {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn main() {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let columns = generate(&mut rng, args.events);

    let item = Arc::new(Field::new("item", DataType::Float64, true));
    let schema = Arc::new(Schema::new(
        COLUMN_NAMES
            .iter()
            .map(|&name| Field::new(name, DataType::List(item.clone()), false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns.iter().map(|rows| list_array(rows)).collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(&args.output).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    let jets: usize = columns[2].iter().map(Vec::len).sum();
    println!(
        "Wrote {} events ({jets} jets) to {}",
        args.events,
        args.output.display()
    );
}
