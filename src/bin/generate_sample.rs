use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One booster generation: how many flights, where from, how heavy, how reliable.
struct Generation {
    category: &'static str,
    flights: usize,
    sites: &'static [&'static str],
    payload_kg: (f64, f64),
    success_rate: f64,
}

const GENERATIONS: [Generation; 5] = [
    Generation {
        category: "v1.0",
        flights: 5,
        sites: &["CCAFS LC-40"],
        payload_kg: (0.0, 700.0),
        success_rate: 0.2,
    },
    Generation {
        category: "v1.1",
        flights: 15,
        sites: &["CCAFS LC-40", "VAFB SLC-4E"],
        payload_kg: (400.0, 5000.0),
        success_rate: 0.35,
    },
    Generation {
        category: "FT",
        flights: 20,
        sites: &["CCAFS LC-40", "KSC LC-39A", "VAFB SLC-4E", "CCAFS SLC-40"],
        payload_kg: (500.0, 7000.0),
        success_rate: 0.7,
    },
    Generation {
        category: "B4",
        flights: 10,
        sites: &["KSC LC-39A", "VAFB SLC-4E", "CCAFS SLC-40"],
        payload_kg: (2000.0, 9600.0),
        success_rate: 0.55,
    },
    Generation {
        category: "B5",
        flights: 6,
        sites: &["KSC LC-39A", "CCAFS SLC-40"],
        payload_kg: (3000.0, 7000.0),
        success_rate: 0.9,
    },
];

struct Launch {
    flight_number: i64,
    site: &'static str,
    class: i64,
    payload_kg: f64,
    booster_version: String,
    category: &'static str,
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut launches = Vec::new();
    for generation in &GENERATIONS {
        for _ in 0..generation.flights {
            let flight_number = launches.len() as i64 + 1;
            let (low, high) = generation.payload_kg;
            launches.push(Launch {
                flight_number,
                site: rng.pick(generation.sites),
                class: (rng.next_f64() < generation.success_rate) as i64,
                payload_kg: rng.uniform(low, high).round(),
                booster_version: format!("F9 {} B{:04}", generation.category, 1000 + flight_number),
                category: generation.category,
            });
        }
    }

    // Write CSV
    let csv_path = "spacex_launch_dash.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    writer.write_record([
        "Flight Number",
        "Launch Site",
        "class",
        "Payload Mass (kg)",
        "Booster Version",
        "Booster Version Category",
    ])?;
    for l in &launches {
        writer.write_record([
            l.flight_number.to_string(),
            l.site.to_string(),
            l.class.to_string(),
            format!("{:.1}", l.payload_kg),
            l.booster_version.clone(),
            l.category.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, true),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
        Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.site))),
        Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
        Arc::new(Float64Array::from_iter_values(launches.iter().map(|l| l.payload_kg))),
        Arc::new(StringArray::from_iter_values(
            launches.iter().map(|l| l.booster_version.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.category))),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    // Write Parquet
    let parquet_path = "spacex_launch_dash.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    let successes = launches.iter().filter(|l| l.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to {csv_path} and {parquet_path}",
        launches.len()
    );
    Ok(())
}
