use crate::cas::CasProfile;
use crate::constants::*;
use crate::errors::*;

/// Policy used to turn classified variants into guides
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Guides for every PAM, amended to the genotype of the individual
    Personalized,
    /// Guides targeting only one of the two chromosome copies
    AlleleSpecific,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub profiles: Vec<CasProfile>,
    pub max_indel: usize,
    pub radius: usize,
    pub raw_strand: bool,
    pub mode: Mode,
}

impl Config {
    pub fn new(profiles: Vec<CasProfile>) -> Config {
        Config {
            profiles,
            max_indel: DEFAULT_MAX_INDEL,
            radius: WINDOW_RADIUS,
            raw_strand: false,
            mode: Mode::Personalized,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            return Err("no nucleases specified".into());
        }

        for cas in &self.profiles {
            if cas.guide_length == 0 {
                return Err(format!("guide length for {} must be positive", cas.name).into());
            } else if self.max_indel >= cas.guide_length {
                return Err(format!(
                    "max indel size ({}) must be smaller than the guide length of {} ({})",
                    self.max_indel, cas.name, cas.guide_length
                )
                .into());
            }
        }

        Ok(())
    }

    /// Reference bases needed on either side of a variant to build every
    /// guide that the variant can affect.
    pub fn flank(&self) -> usize {
        self.profiles
            .iter()
            .map(|cas| self.radius + cas.guide_length + cas.pam_length() + self.max_indel)
            .max()
            .unwrap_or(self.radius)
    }
}
