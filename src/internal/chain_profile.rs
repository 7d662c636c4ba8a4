#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]

use std::error::Error;

use chainmap::HashTable;
use env_logger::Builder;
use log::{LevelFilter, info};
use plotters::prelude::*;
use rand::{Rng, distr::Alphanumeric};

// Keys inserted in total, sampled in equal steps
const MAX_KEYS: usize = 100_000;
const NUM_SAMPLES: usize = 50;
const OUTPUT: &str = "chain_lengths.svg";

struct Sample {
    keys: usize,
    capacity: usize,
    load_factor: f64,
    avg_chain_len: f64,
    max_chain_len: usize,
}

fn init_logger() {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info).format_timestamp_millis().parse_default_env();
    builder.init();
}

// Random alphanumeric key, 8 to 23 characters long
fn random_key(rng: &mut impl Rng) -> String {
    let len = rng.random_range(8..24);
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

// Fills one table with random keys, taking a chain snapshot after every step
fn profile(rng: &mut impl Rng) -> Vec<Sample> {
    let step = MAX_KEYS / NUM_SAMPLES;
    let mut table = HashTable::new();
    let mut samples = Vec::with_capacity(NUM_SAMPLES);
    let mut next_value: usize = 0;

    while table.len() < MAX_KEYS {
        let target = table.len() + step;
        // Random keys may repeat, keep going until the table really holds `target` keys
        while table.len() < target {
            table.insert(random_key(rng), next_value);
            next_value += 1;
        }

        let stats = table.chain_stats();
        let sample = Sample {
            keys: table.len(),
            capacity: table.capacity(),
            load_factor: table.load_factor(),
            avg_chain_len: stats.avg_chain_len(),
            max_chain_len: stats.max_chain_len,
        };
        info!(
            "{:>7} keys, {:>7} buckets, load {:.2}, avg chain {:.2}, max chain {}",
            sample.keys,
            sample.capacity,
            sample.load_factor,
            sample.avg_chain_len,
            sample.max_chain_len
        );
        samples.push(sample);
    }

    info!("final table:\n{}", table.chain_stats());
    samples
}

fn plot(samples: &[Sample]) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let line_width = 2;
    let marker_size = 3;

    let root = SVGBackend::new(OUTPUT, (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 1));

    let max_keys = samples.last().map_or(1, |s| s.keys) + MAX_KEYS / NUM_SAMPLES;

    // Plot 1: average chain length next to the load factor
    let max_avg = samples
        .iter()
        .map(|s| s.avg_chain_len.max(s.load_factor))
        .fold(0.0_f64, f64::max)
        * 1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&areas[0])
        .caption("Average Chain Length and Load Factor", (font_family, 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..max_keys, 0.0..max_avg)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Entries per Bucket")
        .axis_desc_style((font_family, 16))
        .draw()?;

    let avg_style = ShapeStyle::from(&RED).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(samples.iter().map(|s| (s.keys, s.avg_chain_len)), avg_style))?
        .label("Average chain length (non-empty buckets)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], avg_style));

    let load_style = ShapeStyle::from(&BLUE).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(samples.iter().map(|s| (s.keys, s.load_factor)), load_style))?
        .label("Load factor")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], load_style));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    // Plot 2: longest chain
    let max_chain = samples.iter().map(|s| s.max_chain_len).max().unwrap_or(0) as f64 + 1.0;

    let mut chart = ChartBuilder::on(&areas[1])
        .caption("Longest Chain", (font_family, 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..max_keys, 0.0..max_chain)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Entries in Longest Chain")
        .axis_desc_style((font_family, 16))
        .draw()?;

    let max_style = ShapeStyle::from(&GREEN).stroke_width(line_width);
    chart.draw_series(LineSeries::new(
        samples.iter().map(|s| (s.keys, s.max_chain_len as f64)),
        max_style,
    ))?;
    chart.draw_series(
        samples
            .iter()
            .map(|s| Circle::new((s.keys, s.max_chain_len as f64), marker_size, GREEN.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();

    let mut rng = rand::rng();
    let samples = profile(&mut rng);
    plot(&samples)?;

    info!("wrote {OUTPUT}");
    Ok(())
}
