//! Terminal rendering of account state.

use photohelper_core::entitlements::PREMIUM_PRICE;
use photohelper_core::utils::truncate_string;
use photohelper_core::{AuthState, Config, Plan, PremiumFeature, StoreBackend, User};

/// Max width of the user id column
const ID_DISPLAY_WIDTH: usize = 24;

/// One line per published state. Errors are left to the caller, which
/// acknowledges them.
pub fn state_change(state: &AuthState) {
    match state {
        AuthState::Loading => println!("Signing in..."),
        AuthState::Authenticated(user) => println!("Signed in as {} <{}>", user.name, user.email),
        AuthState::Unauthenticated => println!("Signed out"),
        AuthState::Error(_) => {}
    }
}

pub fn profile(user: &User) {
    let plan = user.plan();
    println!("{}", user.name);
    println!("  Email:        {}", user.email);
    println!("  Account:      {}", user.login_method.account_label());
    println!("  User ID:      {}", truncate_string(&user.id, ID_DISPLAY_WIDTH));
    println!("  Member since: {}", user.member_since());
    println!("  Plan:         {} ({})", plan.label(), plan.summary());
    features(plan);
}

pub fn plans() {
    for plan in [Plan::Free, Plan::Premium] {
        println!("{}: {}", plan.label(), plan.summary());
    }
    println!();
    println!("Premium, {}:", PREMIUM_PRICE);
    for feature in PremiumFeature::ALL {
        println!("  {} - {}", feature.title(), feature.description());
    }
}

pub fn config(config: &Config) {
    let store = match config.store {
        StoreBackend::File => "file",
        StoreBackend::Keyring => "keyring",
        StoreBackend::Memory => "memory",
    };
    println!("Session store: {}", store);
    println!("Login delay:   {} ms", config.login_delay_ms);
    match config.data_dir() {
        Ok(dir) => println!("Data dir:      {}", dir.display()),
        Err(e) => println!("Data dir:      unavailable ({})", e),
    }
}

fn features(plan: Plan) {
    for feature in PremiumFeature::ALL {
        let mark = if plan.has(feature) { "x" } else { " " };
        println!("  [{}] {}", mark, feature.title());
    }
}
