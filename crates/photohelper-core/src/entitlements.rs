//! Premium entitlement model.
//!
//! The entitlement is a single flag on [`User`](crate::User); this module
//! describes what that flag unlocks so front ends can render the plan and
//! gate features without hard-coding the list.

/// Monthly price advertised on the upgrade screen
pub const PREMIUM_PRICE: &str = "$4.99/month";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    pub fn label(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Premium => "Premium",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Plan::Free => "Basic features with ads",
            Plan::Premium => "All features unlocked",
        }
    }

    pub fn has(&self, feature: PremiumFeature) -> bool {
        match self {
            Plan::Premium => true,
            Plan::Free => !feature.requires_premium(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumFeature {
    NoAds,
    UnlimitedStorage,
    AdvancedEditing,
    CloudBackup,
}

impl PremiumFeature {
    pub const ALL: [PremiumFeature; 4] = [
        PremiumFeature::NoAds,
        PremiumFeature::UnlimitedStorage,
        PremiumFeature::AdvancedEditing,
        PremiumFeature::CloudBackup,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PremiumFeature::NoAds => "No Advertisements",
            PremiumFeature::UnlimitedStorage => "Unlimited Storage",
            PremiumFeature::AdvancedEditing => "Advanced Tools",
            PremiumFeature::CloudBackup => "Cloud Backup",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PremiumFeature::NoAds => "Enjoy uninterrupted photo editing",
            PremiumFeature::UnlimitedStorage => "Save as many photos as you want",
            PremiumFeature::AdvancedEditing => "Access professional editing features",
            PremiumFeature::CloudBackup => "Automatic backup to the cloud",
        }
    }

    /// Every listed feature is premium-only today.
    pub fn requires_premium(&self) -> bool {
        true
    }
}
