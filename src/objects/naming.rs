const ROMAN: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// Roman numeral for a 1-based ordinal; falls back to digits past ten
pub fn roman(ordinal: usize) -> String {
    match ordinal {
        1..=10 => ROMAN[ordinal - 1].to_string(),
        n => n.to_string(),
    }
}

pub fn planet_name(system_name: &str, ordinal: usize) -> String {
    format!("{} {}", system_name, roman(ordinal))
}

pub fn asteroid_name(system_name: &str) -> String {
    format!("{} Asteroid", system_name)
}

/// `<parent>-a`, `<parent>-b`, ... for the n-th moon (0-based) of a parent
pub fn moon_name(parent_name: &str, moon_index: usize) -> String {
    let suffix = (b'a' + (moon_index % 26) as u8) as char;
    format!("{}-{}", parent_name, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(planet_name("Barnard's Star", 4), "Barnard's Star IV");
        assert_eq!(roman(11), "11");
        assert_eq!(asteroid_name("Wolf 359"), "Wolf 359 Asteroid");
        assert_eq!(moon_name("Wolf 359 II", 0), "Wolf 359 II-a");
        assert_eq!(moon_name("Wolf 359 II", 2), "Wolf 359 II-c");
    }
}
