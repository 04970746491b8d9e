use crate::constants::DEFAULT_GUIDE_LENGTH;
use crate::errors::*;

/// Position of the PAM relative to the guide, on the guide's strand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    ThreePrime,
    FivePrime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CasProfile {
    pub name: &'static str,
    pub orientation: Orientation,

    // Motif on the forward strand and its reverse complement; the latter
    // finds reverse-strand sites without reverse complementing the genome
    pub forward_pattern: &'static [u8],
    pub reverse_pattern: &'static [u8],

    pub guide_length: usize,
}

const REGISTRY: [(&str, Orientation, &[u8], &[u8]); 12] = [
    ("SpCas9", Orientation::ThreePrime, b"NGG", b"CCN"),
    ("SpCas9_VRER", Orientation::ThreePrime, b"NGCG", b"CGCN"),
    ("SpCas9_EQR", Orientation::ThreePrime, b"NGAG", b"CTCN"),
    ("SpCas9_VQR_1", Orientation::ThreePrime, b"NGA", b"TCN"),
    ("SpCas9_VQR_2", Orientation::ThreePrime, b"NGNG", b"CNCN"),
    ("StCas9", Orientation::ThreePrime, b"NNAGAA", b"TTCTNN"),
    ("StCas9_2", Orientation::ThreePrime, b"NGGNG", b"CNCCN"),
    ("SaCas9", Orientation::ThreePrime, b"NNGRRT", b"AYYCNN"),
    ("SaCas9_KKH", Orientation::ThreePrime, b"NNNRRT", b"AYYNNN"),
    ("nmCas9", Orientation::ThreePrime, b"NNNNGMTT", b"AAKCNNNN"),
    ("cjCas9", Orientation::ThreePrime, b"NNNNACA", b"TGTNNNN"),
    ("cpf1", Orientation::FivePrime, b"TTTN", b"NAAA"),
];

impl CasProfile {
    pub fn get(name: &str) -> Option<CasProfile> {
        REGISTRY
            .iter()
            .find(|(key, ..)| key.eq_ignore_ascii_case(name))
            .map(|&(name, orientation, forward_pattern, reverse_pattern)| CasProfile {
                name,
                orientation,
                forward_pattern,
                reverse_pattern,
                guide_length: DEFAULT_GUIDE_LENGTH,
            })
    }

    pub fn lookup(name: &str) -> Result<CasProfile> {
        Self::get(name.trim()).ok_or_else(|| ErrorKind::UnknownNuclease(name.trim().into()).into())
    }

    pub fn all() -> Vec<CasProfile> {
        REGISTRY
            .iter()
            .filter_map(|(name, ..)| Self::get(name))
            .collect()
    }

    /// Resolves a comma-separated list of nucleases, or `all`. Guide lengths
    /// are either a single value used for every nuclease, or one value per
    /// nuclease.
    pub fn parse_list(names: &str, guide_lengths: &[usize]) -> Result<Vec<CasProfile>> {
        let profiles = if names.trim().eq_ignore_ascii_case("all") {
            Self::all()
        } else {
            names
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(Self::lookup)
                .collect::<Result<Vec<_>>>()?
        };

        if profiles.is_empty() {
            return Err("no nucleases specified".into());
        }

        match guide_lengths {
            [] => Ok(profiles),
            [length] => Ok(profiles
                .into_iter()
                .map(|cas| cas.with_guide_length(*length))
                .collect()),
            lengths if lengths.len() == profiles.len() => Ok(profiles
                .into_iter()
                .zip(lengths.iter())
                .map(|(cas, length)| cas.with_guide_length(*length))
                .collect()),
            lengths => Err(format!(
                "{} guide lengths given for {} nucleases",
                lengths.len(),
                profiles.len()
            )
            .into()),
        }
    }

    pub fn with_guide_length(mut self, guide_length: usize) -> CasProfile {
        self.guide_length = guide_length;
        self
    }

    pub fn pam_length(&self) -> usize {
        self.forward_pattern.len()
    }

    pub fn index_extension(&self) -> String {
        format!(".pamvar_{}", self.name.to_ascii_lowercase())
    }

    pub fn summarize(&self) -> String {
        let end = match self.orientation {
            Orientation::ThreePrime => "3'",
            Orientation::FivePrime => "5'",
        };

        format!(
            "{} with {} PAM {} and {} bp guides",
            self.name,
            end,
            String::from_utf8_lossy(self.forward_pattern),
            self.guide_length
        )
    }
}
