use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

const DAYS: usize = 120;
const POPULATION: f64 = 50_000.0;

/// One simulated day of surveillance data.
struct DayRecord {
    day: usize,
    cases: f64,
    deaths: f64,
    temperature: f64,
    rainfall: f64,
}

/// Discrete SIR epidemic with noisy reporting.
fn simulate(rng: &mut Noise) -> Vec<DayRecord> {
    let (beta, gamma, fatality) = (0.28, 0.1, 0.012);
    let mut s = POPULATION - 10.0;
    let mut i = 10.0;

    (0..DAYS)
        .map(|day| {
            let new_infections = beta * s * i / POPULATION;
            let recoveries = gamma * i;
            s -= new_infections;
            i += new_infections - recoveries;

            let seasonal = (day as f64 / 365.0 * 2.0 * std::f64::consts::PI).sin();
            DayRecord {
                day: day + 1,
                cases: (new_infections + rng.normal(new_infections.sqrt().max(1.0))).max(0.0).round(),
                deaths: (recoveries * fatality + rng.normal(0.5)).max(0.0).round(),
                temperature: 24.0 + 6.0 * seasonal + rng.normal(1.5),
                rainfall: (rng.uniform() * 20.0 - 8.0).max(0.0),
            }
        })
        .collect()
}

/// Seeded noise source (SplitMix64), so every run writes the same files.
struct Noise(u64);

impl Noise {
    /// Uniform in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 * f64::EPSILON / 2.0
    }

    /// Zero-mean normal sample (Marsaglia polar method).
    fn normal(&mut self, std_dev: f64) -> f64 {
        loop {
            let u = 2.0 * self.uniform() - 1.0;
            let v = 2.0 * self.uniform() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                return std_dev * u * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }
}

const HEADER: [&str; 5] = ["day", "cases", "deaths", "temperature", "rainfall"];

fn write_csv(path: &str, records: &[DayRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADER)?;
    for r in records {
        writer.write_record([
            r.day.to_string(),
            r.cases.to_string(),
            r.deaths.to_string(),
            format!("{:.1}", r.temperature),
            format!("{:.1}", r.rainfall),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &str, records: &[DayRecord]) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("surveillance")?;
    for (col, name) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, r) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, r.day as f64)?;
        sheet.write_number(row, 1, r.cases)?;
        sheet.write_number(row, 2, r.deaths)?;
        sheet.write_number(row, 3, (r.temperature * 10.0).round() / 10.0)?;
        sheet.write_number(row, 4, (r.rainfall * 10.0).round() / 10.0)?;
    }

    // Only the first sheet is read by the client; this one documents the data.
    let notes = workbook.add_worksheet();
    notes.set_name("notes")?;
    notes.write_string(0, 0, "Synthetic SIR outbreak, seed 42")?;

    workbook.save(path).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = Noise(42);
    let records = simulate(&mut rng);

    write_csv("sample_data.csv", &records)?;
    write_xlsx("sample_data.xlsx", &records)?;

    println!(
        "Wrote {} days ({} columns) to sample_data.csv and sample_data.xlsx",
        records.len(),
        HEADER.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let a = simulate(&mut Noise(42));
        let b = simulate(&mut Noise(42));
        assert_eq!(a.len(), DAYS);
        assert!(a.iter().zip(&b).all(|(x, y)| x.cases == y.cases && x.rainfall == y.rainfall));
    }

    #[test]
    fn noise_stays_in_range() {
        let mut rng = Noise(7);
        let draws: Vec<f64> = (0..10_000).map(|_| rng.uniform()).collect();
        assert!(draws.iter().all(|u| (0.0..1.0).contains(u)));

        let mean = (0..10_000).map(|_| rng.normal(1.0)).sum::<f64>() / 10_000.0;
        assert!(mean.abs() < 0.1, "{mean}");
    }

    #[test]
    fn counts_are_whole_and_non_negative() {
        for r in simulate(&mut Noise(42)) {
            assert!(r.cases >= 0.0 && r.cases.fract() == 0.0);
            assert!(r.deaths >= 0.0 && r.rainfall >= 0.0);
        }
    }
}
