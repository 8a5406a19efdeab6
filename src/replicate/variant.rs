use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackendVariant {
    #[default]
    #[serde(rename = "flux-kontext-pro")]
    Kontext,
    #[serde(rename = "flux-2-pro")]
    Pro,
    #[serde(rename = "flux-2-flex")]
    Flex,
    #[serde(rename = "flux-1.1-pro-ultra")]
    Ultra,
    #[serde(rename = "flux-schnell")]
    Schnell,
}

impl BackendVariant {
    pub const FALLBACK_ORDER: [BackendVariant; 4] = [
        BackendVariant::Kontext,
        BackendVariant::Pro,
        BackendVariant::Ultra,
        BackendVariant::Schnell,
    ];

    pub fn wire_id(&self) -> &'static str {
        match self {
            BackendVariant::Kontext => "flux-kontext-pro",
            BackendVariant::Pro => "flux-2-pro",
            BackendVariant::Flex => "flux-2-flex",
            BackendVariant::Ultra => "flux-1.1-pro-ultra",
            BackendVariant::Schnell => "flux-schnell",
        }
    }

    pub fn model_path(&self) -> &'static str {
        match self {
            BackendVariant::Kontext => "black-forest-labs/flux-kontext-pro",
            BackendVariant::Pro => "black-forest-labs/flux-2-pro",
            BackendVariant::Flex => "black-forest-labs/flux-2-flex",
            BackendVariant::Ultra => "black-forest-labs/flux-1.1-pro-ultra",
            BackendVariant::Schnell => "black-forest-labs/flux-schnell",
        }
    }

    pub fn from_wire_id(value: &str) -> Option<BackendVariant> {
        match value {
            "flux-kontext-pro" => Some(BackendVariant::Kontext),
            "flux-2-pro" => Some(BackendVariant::Pro),
            "flux-2-flex" => Some(BackendVariant::Flex),
            "flux-1.1-pro-ultra" => Some(BackendVariant::Ultra),
            "flux-schnell" => Some(BackendVariant::Schnell),
            _ => None,
        }
    }

    pub fn fallback_chain(&self) -> Vec<BackendVariant> {
        let mut chain = vec![*self];
        chain.extend(
            Self::FALLBACK_ORDER
                .iter()
                .copied()
                .filter(|variant| variant != self),
        );
        chain
    }
}

impl fmt::Display for BackendVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_ids_round_trip() {
        for variant in [
            BackendVariant::Kontext,
            BackendVariant::Pro,
            BackendVariant::Flex,
            BackendVariant::Ultra,
            BackendVariant::Schnell,
        ] {
            assert_eq!(BackendVariant::from_wire_id(variant.wire_id()), Some(variant));
        }
        assert_eq!(BackendVariant::from_wire_id("flux-3-mega"), None);
    }

    #[test]
    fn model_paths_are_fully_qualified() {
        assert_eq!(
            BackendVariant::Kontext.model_path(),
            "black-forest-labs/flux-kontext-pro"
        );
        assert_eq!(
            BackendVariant::Ultra.model_path(),
            "black-forest-labs/flux-1.1-pro-ultra"
        );
    }

    #[test]
    fn serde_uses_the_wire_ids() {
        let parsed: BackendVariant = serde_json::from_str("\"flux-1.1-pro-ultra\"").unwrap();
        assert_eq!(parsed, BackendVariant::Ultra);
        assert_eq!(
            serde_json::to_string(&BackendVariant::Schnell).unwrap(),
            "\"flux-schnell\""
        );
        assert!(serde_json::from_str::<BackendVariant>("\"flux-unknown\"").is_err());
    }

    #[test]
    fn requested_variant_leads_its_fallback_chain() {
        assert_eq!(
            BackendVariant::Kontext.fallback_chain(),
            vec![
                BackendVariant::Kontext,
                BackendVariant::Pro,
                BackendVariant::Ultra,
                BackendVariant::Schnell,
            ]
        );
        assert_eq!(
            BackendVariant::Ultra.fallback_chain(),
            vec![
                BackendVariant::Ultra,
                BackendVariant::Kontext,
                BackendVariant::Pro,
                BackendVariant::Schnell,
            ]
        );
    }

    #[test]
    fn flex_is_only_attempted_when_requested() {
        let chain = BackendVariant::Flex.fallback_chain();
        assert_eq!(
            chain,
            vec![
                BackendVariant::Flex,
                BackendVariant::Kontext,
                BackendVariant::Pro,
                BackendVariant::Ultra,
                BackendVariant::Schnell,
            ]
        );

        for requested in [
            BackendVariant::Kontext,
            BackendVariant::Pro,
            BackendVariant::Ultra,
            BackendVariant::Schnell,
        ] {
            let chain = requested.fallback_chain();
            assert_eq!(chain.len(), 4);
            assert!(!chain.contains(&BackendVariant::Flex));
        }
    }

    #[test]
    fn fallback_chains_never_repeat_a_variant() {
        for requested in [
            BackendVariant::Kontext,
            BackendVariant::Pro,
            BackendVariant::Flex,
            BackendVariant::Ultra,
            BackendVariant::Schnell,
        ] {
            let chain = requested.fallback_chain();
            let mut seen = std::collections::HashSet::new();
            for variant in &chain {
                assert!(seen.insert(*variant), "duplicate {variant} in chain");
            }
            assert_eq!(chain[0], requested);
        }
    }
}
