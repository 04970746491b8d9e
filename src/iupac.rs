const A: u8 = 0b0001;
const C: u8 = 0b0010;
const G: u8 = 0b0100;
const T: u8 = 0b1000;

const MAPPING: [(u8, u8); 15] = [
    (b'A', A),
    (b'C', C),
    (b'G', G),
    (b'T', T),
    (b'R', A | G),
    (b'Y', C | T),
    (b'S', G | C),
    (b'W', A | T),
    (b'K', G | T),
    (b'M', A | C),
    (b'B', C | G | T),
    (b'D', A | G | T),
    (b'H', A | C | T),
    (b'V', A | C | G),
    (b'N', A | C | G | T),
];

lazy_static! {
    static ref MASKS: [u8; 256] = {
        let mut table = [0; 256];

        for &(code, mask) in &MAPPING {
            table[code as usize] = mask;
            table[code.to_ascii_lowercase() as usize] = mask;
        }

        table
    };
}

fn is_base(nuc: u8) -> bool {
    matches!(nuc.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
}

/// Returns true if `candidate` is a concrete nucleotide in the class `query`.
///
/// Both arguments are case-insensitive. Ambiguous bases in the candidate
/// (including `N`) never match, since they do not identify a real site.
pub fn matches(query: u8, candidate: u8) -> bool {
    is_base(candidate) && MASKS[query as usize] & MASKS[candidate as usize] != 0
}

/// Returns true if every position of `pattern` matches `window`
pub fn matches_pattern(pattern: &[u8], window: &[u8]) -> bool {
    pattern.len() == window.len()
        && pattern
            .iter()
            .zip(window.iter())
            .all(|(&query, &candidate)| matches(query, candidate))
}

/// Returns true if `allele` is a literal nucleotide sequence that can be
/// substituted into the reference; symbolic alleles such as `<DEL>`, `*`
/// or multi-allelic lists are not.
pub fn is_literal(allele: &[u8]) -> bool {
    !allele.is_empty()
        && allele
            .iter()
            .all(|&nuc| is_base(nuc) || nuc.to_ascii_uppercase() == b'N')
}
