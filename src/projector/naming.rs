use crate::keyed::jitter;

static SECTOR_PREFIXES: &[&str] = &[
    "Helion", "Koros", "Velarn", "Nadir", "Procyon", "Altaris", "Veyra", "Talios", "Meridian",
    "Triarch", "Nomad", "Aurigon", "Serpentis", "Draxis", "Cygnera", "Luyten", "Epsara", "Tauven",
    "Sigmar", "Zethys", "Khoras", "Frontier", "Pioneer", "Arcturon", "Vegaine",
];

static SECTOR_WORDS: &[&str] = &["Sector", "Cluster", "Reach", "Arc", "Belt", "Verge", "Expanse"];

fn pick<'a>(key: &str, list: &[&'a str]) -> &'a str {
    list[jitter(key, 0, list.len() as i32 - 1) as usize]
}

/// Sector-style name for a star with no catalog name, e.g. `Koros Cluster-03`.
///
/// Depends only on the catalog identifier.
pub fn synthetic_name(catalog_id: &str) -> String {
    let prefix = pick(&format!("name:{}:prefix", catalog_id), SECTOR_PREFIXES);
    let word = pick(&format!("name:{}:sector", catalog_id), SECTOR_WORDS);
    let number = jitter(&format!("name:{}:number", catalog_id), 1, 99);
    format!("{} {}-{:02}", prefix, word, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_name_shape() {
        for id in ["1", "70890", "12.34000,-5.00000,0.10000", "HIP 1234"] {
            let name = synthetic_name(id);
            let (prefix, rest) = name.split_once(' ').unwrap();
            let (word, number) = rest.rsplit_once('-').unwrap();
            assert!(SECTOR_PREFIXES.contains(&prefix), "{}", name);
            assert!(SECTOR_WORDS.contains(&word), "{}", name);
            assert_eq!(number.len(), 2);
            let n: u32 = number.parse().unwrap();
            assert!((1..=99).contains(&n));
        }
    }

    #[test]
    fn test_synthetic_name_is_stable() {
        assert_eq!(synthetic_name("118"), synthetic_name("118"));
        let distinct: std::collections::HashSet<String> =
            (0..50).map(|i| synthetic_name(&i.to_string())).collect();
        assert!(distinct.len() > 40);
    }
}
