//! Templ configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use templ_curve::{validate_entry_fee, FeeCurve};
use templ_governance::GovernanceParams;
use templ_treasury::FeeSplit;
use templ_types::{is_valid_bps, Address};

use crate::error::TemplError;

/// Display metadata for a Templ.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo_uri: String,
}

/// Everything needed to deploy a Templ, usually read from a TOML file with
/// [`TemplConfig::from_toml_file`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplConfig {
    /// Token charged for entry and used for proposal fees.
    #[serde(default)]
    pub access_token: Address,

    /// Founding member with the priest's privileges.
    #[serde(default)]
    pub priest: Address,

    /// Fixed recipient of the protocol share of every entry fee.
    #[serde(default)]
    pub protocol_fee_recipient: Address,

    /// Where the burn share of every entry fee is sent.
    #[serde(default = "default_burn_address")]
    pub burn_address: Address,

    /// Entry fee at zero paid joins (the curve's anchor).
    #[serde(default = "default_entry_fee")]
    pub entry_fee: u64,

    #[serde(default)]
    pub curve: FeeCurve,

    #[serde(default)]
    pub split: FeeSplit,

    #[serde(default)]
    pub governance: GovernanceParams,

    #[serde(default)]
    pub metadata: TemplMetadata,

    /// Member cap. 0 means unlimited.
    #[serde(default)]
    pub max_members: u64,

    #[serde(default)]
    pub join_paused: bool,

    /// Share of the current entry fee charged to open a proposal.
    #[serde(default)]
    pub proposal_fee_bps: u32,

    /// Share of the member-pool slice paid to a referrer.
    #[serde(default)]
    pub referral_share_bps: u32,

    /// Votes the priest carries while the templ is small.
    #[serde(default = "default_priest_vote_weight")]
    pub priest_vote_weight: u64,

    /// Member count at which the priest's weight drops back to 1.
    #[serde(default)]
    pub priest_weight_threshold: u64,

    #[serde(default)]
    pub council_mode: bool,

    #[serde(default)]
    pub dictatorship: bool,

    /// Initial council. Every entry must also be a genesis member (or the priest).
    #[serde(default)]
    pub council: Vec<Address>,

    /// Members installed at deployment without paying. The priest is always one.
    #[serde(default)]
    pub genesis_members: Vec<Address>,

    /// "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_burn_address() -> Address {
    let mut bytes = [0u8; 20];
    bytes[18] = 0xde;
    bytes[19] = 0xad;
    Address::new(bytes)
}

fn default_entry_fee() -> u64 {
    1_000_000
}

fn default_priest_vote_weight() -> u64 {
    1
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TemplConfig {
    /// Read and parse a TOML config file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TemplError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TemplError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse a TOML document. Omitted fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, TemplError> {
        toml::from_str(s).map_err(|e| TemplError::Config(e.to_string()))
    }

    /// Render back to TOML, every field spelled out.
    pub fn to_toml_string(&self) -> Result<String, TemplError> {
        toml::to_string_pretty(self).map_err(|e| TemplError::Config(e.to_string()))
    }

    /// Genesis members in join order, priest first, without duplicates.
    pub fn genesis_roster(&self) -> Vec<Address> {
        let mut seen = BTreeSet::new();
        std::iter::once(self.priest)
            .chain(self.genesis_members.iter().copied())
            .filter(|member| seen.insert(*member))
            .collect()
    }

    /// Check every field a Templ would otherwise reject at construction.
    pub fn validate(&self) -> Result<(), TemplError> {
        for address in [
            self.access_token,
            self.priest,
            self.protocol_fee_recipient,
            self.burn_address,
        ] {
            if address.is_zero() {
                return Err(TemplError::InvalidRecipient);
            }
        }
        validate_entry_fee(self.entry_fee as u128)?;
        self.curve.validate()?;
        self.split.validate()?;
        self.governance.validate()?;
        for (field, bps) in [
            ("proposal_fee_bps", self.proposal_fee_bps),
            ("referral_share_bps", self.referral_share_bps),
        ] {
            if !is_valid_bps(bps) {
                return Err(TemplError::Config(format!("{field} {bps} exceeds 10000")));
            }
        }
        if self.priest_vote_weight == 0 {
            return Err(TemplError::Config("priest_vote_weight must be at least 1".into()));
        }
        let roster = self.genesis_roster();
        if roster.iter().any(|m| m.is_zero()) {
            return Err(TemplError::InvalidRecipient);
        }
        if self.max_members > 0 && (roster.len() as u64) > self.max_members {
            return Err(TemplError::MemberLimitTooLow {
                max: self.max_members,
                current: roster.len() as u64,
            });
        }
        if self.council.iter().any(|c| !roster.contains(c)) {
            return Err(TemplError::NotMember);
        }
        if self.council_mode && self.council.is_empty() {
            return Err(templ_governance::GovernanceError::NoCouncilMembers.into());
        }
        self.log_format.parse::<crate::logging::LogFormat>()?;
        Ok(())
    }
}

impl Default for TemplConfig {
    fn default() -> Self {
        Self {
            access_token: Address::ZERO,
            priest: Address::ZERO,
            protocol_fee_recipient: Address::ZERO,
            burn_address: default_burn_address(),
            entry_fee: default_entry_fee(),
            curve: FeeCurve::default(),
            split: FeeSplit::default(),
            governance: GovernanceParams::default(),
            metadata: TemplMetadata::default(),
            max_members: 0,
            join_paused: false,
            proposal_fee_bps: 0,
            referral_share_bps: 0,
            priest_vote_weight: default_priest_vote_weight(),
            priest_weight_threshold: 0,
            council_mode: false,
            dictatorship: false,
            council: Vec::new(),
            genesis_members: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
