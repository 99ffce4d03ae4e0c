use anyhow::{Context, Result};

const GENRES: &[&str] = &[
    "Action", "Adventure", "Comedy", "Drama", "Fantasy", "Romance", "Sci-Fi", "Slice of Life",
    "Mystery", "Sports", "Mecha", "Supernatural",
];
const STUDIOS: &[&str] = &[
    "Madhouse", "Sunrise", "Bones", "Kyoto Animation", "Production I.G", "Toei Animation",
    "Studio Ghibli", "Wit Studio", "MAPPA", "Shaft",
];
const TYPES: &[&str] = &["TV", "Movie", "OVA", "ONA"];
const SYLLABLES: &[&str] = &[
    "ka", "ze", "no", "hi", "ka", "ri", "to", "mo", "sa", "ku", "ra", "yu", "me", "shi", "ro",
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn title(rng: &mut SimpleRng) -> String {
    let words = 1 + rng.below(3);
    (0..words)
        .map(|_| {
            let len = 2 + rng.below(3);
            let word: String = (0..len).map(|_| rng.pick(SYLLABLES)).collect();
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => word,
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Python-style list literal, the encoding the export uses.
/// One to three distinct genres.
fn draw_genres(rng: &mut SimpleRng) -> Vec<&'static str> {
    let mut genres: Vec<&str> = (0..1 + rng.below(3)).map(|_| rng.pick(GENRES)).collect();
    genres.sort_unstable();
    genres.dedup();
    genres
}

fn list_literal(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("'{i}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_animes.csv".to_string());
    let rows: usize = 600;
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer
        .write_record([
            "Nome",
            "Nota",
            "Avaliado por",
            "Episodio",
            "Data de Exibição",
            "Genero",
            "Estudio",
            "Tipo",
        ])
        .context("writing header")?;

    for i in 0..rows {
        let year = 1985 + rng.below(39) as i32;
        let month = 1 + rng.below(12);
        let day = 1 + rng.below(28);

        let mut genres = draw_genres(&mut rng);
        let mut studios = vec![rng.pick(STUDIOS)];

        // Noise the tolerant-ingestion path has to cope with.
        let mut name = title(&mut rng);
        let mut kind = rng.pick(TYPES).to_string();
        match i % 50 {
            7 => name.clear(),
            13 => kind = "Present (Music Video)".to_string(),
            21 => genres.push("TV"),
            29 => studios.push("Status: Finished Airing"),
            37 => studios = vec!["2007"],
            _ => {}
        }

        let rating = if rng.next_f64() < 0.05 {
            String::new()
        } else {
            format!("{:.2}", rng.gauss(7.0, 0.8).clamp(1.0, 10.0))
        };
        let rated_by = format!("{}", (rng.gauss(8.0, 2.0).exp()).round() as u64);
        let episodes = format!("{}", 1 + rng.below(52));
        let aired = if rng.next_f64() < 0.03 {
            "Not available".to_string()
        } else {
            format!("{year}-{month:02}-{day:02}")
        };

        writer
            .write_record([
                name,
                rating,
                rated_by,
                episodes,
                aired,
                list_literal(&genres),
                list_literal(&studios),
                kind,
            ])
            .with_context(|| format!("writing row {i}"))?;
    }

    writer.flush().context("flushing output")?;
    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawn_genres_are_distinct() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..500 {
            let genres = draw_genres(&mut rng);
            assert!((1..=3).contains(&genres.len()));
            assert!(genres.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
