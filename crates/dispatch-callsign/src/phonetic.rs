//! Radio phonetics (APCO 1941 alphabet, as still used by many US agencies).

const ALPHABET: [&str; 26] = [
    "Adam", "Boy", "Charles", "David", "Edward", "Frank", "George", "Henry",
    "Ida", "John", "King", "Lincoln", "Mary", "Nora", "Ocean", "Paul",
    "Queen", "Robert", "Sam", "Tom", "Union", "Victor", "William", "X-ray",
    "Young", "Zebra",
];

const DIGITS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "niner",
];

/// Radio word for an ASCII letter; anything else reads as `?`.
pub fn letter_word(letter: char) -> &'static str {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        ALPHABET[(upper as u8 - b'A') as usize]
    } else {
        "?"
    }
}

/// Digits read one at a time: `214` → `"two one four"`.
pub fn spoken_digits(n: u32) -> String {
    n.to_string()
        .bytes()
        .map(|b| DIGITS[(b - b'0') as usize])
        .collect::<Vec<_>>()
        .join(" ")
}
