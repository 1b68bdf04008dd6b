use std::path::PathBuf;

use anyhow::{Context, Result};

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick from `(value, weight)` pairs.
    fn weighted<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for &(value, weight) in choices {
            if roll < weight {
                return value;
            }
            roll -= weight;
        }
        choices.last().map(|(v, _)| *v).unwrap_or("")
    }
}

const AGES: &[(&str, f64)] = &[
    ("<18", 1.0),
    ("18-24", 4.0),
    ("25-34", 10.0),
    ("35-44", 9.0),
    ("45-54", 4.0),
    ("55-64", 1.5),
    ("unknown", 0.5),
];
const EDU: &[(&str, f64)] = &[("Primary", 0.5), ("Secondary", 3.0), ("Higher", 8.0)];
const INDUSTRIES: &[(&str, f64)] = &[
    ("IT", 8.0),
    ("Finance", 3.0),
    ("Education", 2.0),
    ("Healthcare", 1.5),
    ("Manufacturing", 1.5),
    ("Marketing", 1.0),
    ("Public sector", 1.0),
    ("Retail", 0.8),
    ("Logistics", 0.7),
    ("Energy", 0.5),
    ("Telecommunications", 0.5),
    ("", 2.0),
];
const SWEET_SALTY: &[(&str, f64)] = &[("sweet", 5.0), ("salty", 4.0), ("", 0.5)];
const EXPERIENCE: &[(&str, f64)] = &[
    ("0-2", 3.0),
    ("3-5", 3.0),
    ("6-10", 3.5),
    ("11-15", 2.5),
    (">=16", 2.0),
];
const ANIMALS: &[(&str, f64)] = &[
    ("Dogs", 5.0),
    ("Cats", 4.0),
    ("Cats and Dogs", 2.0),
    ("Other", 1.0),
    ("No favorites", 1.0),
    ("", 0.5),
];
const PLACES: &[(&str, f64)] = &[
    ("By the sea", 5.0),
    ("In the mountains", 4.0),
    ("By the lake", 1.5),
    ("In the forest", 1.0),
    ("", 0.5),
];

const HOBBIES: &[(&str, f64)] = &[
    ("hobby_art", 0.25),
    ("hobby_books", 0.45),
    ("hobby_movies", 0.4),
    ("hobby_other", 0.2),
    ("hobby_sport", 0.5),
    ("hobby_video_games", 0.3),
];
const MOTIVATIONS: &[(&str, f64)] = &[
    ("motivation_career", 0.6),
    ("motivation_challenges", 0.4),
    ("motivation_creativity_and_innovation", 0.35),
    ("motivation_money_and_job", 0.45),
    ("motivation_personal_growth", 0.55),
    ("motivation_remote", 0.2),
];
const LEARNING: &[(&str, f64)] = &[
    ("learning_pref_books", 0.3),
    ("learning_pref_chatgpt", 0.5),
    ("learning_pref_offline_courses", 0.15),
    ("learning_pref_online_courses", 0.7),
    ("learning_pref_personal_projects", 0.45),
    ("learning_pref_teaching", 0.1),
    ("learning_pref_teamwork", 0.2),
    ("learning_pref_workshops", 0.15),
];

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "sample_survey.csv".into()));
    let rows: usize = match args.next() {
        Some(n) => n.parse().context("row count must be a positive integer")?,
        None => 250,
    };

    let mut rng = SimpleRng::new(42);

    let mut header = vec![
        "age",
        "edu_level",
        "fav_animals",
        "fav_place",
        "gender",
        "industry",
        "sweet_or_salty",
        "years_of_experience",
    ];
    header.extend(HOBBIES.iter().map(|(name, _)| *name));
    header.extend(MOTIVATIONS.iter().map(|(name, _)| *name));
    header.extend(LEARNING.iter().map(|(name, _)| *name));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record(&header)?;

    for _ in 0..rows {
        let gender = if rng.chance(0.05) {
            ""
        } else if rng.chance(0.6) {
            "1.0"
        } else {
            "0.0"
        };

        let mut record: Vec<String> = [
            rng.weighted(AGES),
            rng.weighted(EDU),
            rng.weighted(ANIMALS),
            rng.weighted(PLACES),
            gender,
            rng.weighted(INDUSTRIES),
            rng.weighted(SWEET_SALTY),
            rng.weighted(EXPERIENCE),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        for &(_, p) in HOBBIES.iter().chain(MOTIVATIONS).chain(LEARNING) {
            record.push(if rng.chance(p) { "1" } else { "0" }.to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!(
        "Wrote {rows} survey responses ({} columns) to {}",
        header.len(),
        output_path.display()
    );
    Ok(())
}
