use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target and horizon used when neither the request nor a goal kind names one.
pub const DEFAULT_TARGET: f64 = 1_000_000.0;
pub const DEFAULT_YEARS: i64 = 10;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalKind {
    Retirement,
    Home,
    Education,
    Car,
    Bike,
    Business,
    Travel,
    Wedding,
    Wealth,
    Sabbatical,
    Family,
    Child,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProfile {
    pub kind: GoalKind,
    pub title: &'static str,
    pub description: &'static str,
    pub default_years: u32,
    pub default_amount: f64,
}

impl GoalKind {
    pub const ALL: [GoalKind; 13] = [
        GoalKind::Retirement,
        GoalKind::Home,
        GoalKind::Education,
        GoalKind::Car,
        GoalKind::Bike,
        GoalKind::Business,
        GoalKind::Travel,
        GoalKind::Wedding,
        GoalKind::Wealth,
        GoalKind::Sabbatical,
        GoalKind::Family,
        GoalKind::Child,
        GoalKind::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoalKind::Retirement => "retirement",
            GoalKind::Home => "home",
            GoalKind::Education => "education",
            GoalKind::Car => "car",
            GoalKind::Bike => "bike",
            GoalKind::Business => "business",
            GoalKind::Travel => "travel",
            GoalKind::Wedding => "wedding",
            GoalKind::Wealth => "wealth",
            GoalKind::Sabbatical => "sabbatical",
            GoalKind::Family => "family",
            GoalKind::Child => "child",
            GoalKind::Custom => "custom",
        }
    }

    pub fn profile(self) -> GoalProfile {
        let (title, description, default_years, default_amount) = match self {
            GoalKind::Retirement => (
                "Retirement Planning",
                "Secure your golden years with a solid retirement plan",
                25,
                5_000_000.0,
            ),
            GoalKind::Home => (
                "Home Purchase Planning",
                "Plan for buying your dream home",
                7,
                3_000_000.0,
            ),
            GoalKind::Education => (
                "Education Planning",
                "Invest in your educational future",
                5,
                1_500_000.0,
            ),
            GoalKind::Car => ("Car Purchase Planning", "Save for your dream car", 3, 800_000.0),
            GoalKind::Bike => ("Bike Purchase Planning", "Save for your new bike", 2, 200_000.0),
            GoalKind::Business => (
                "Business Investment Planning",
                "Plan your business venture funding",
                5,
                2_000_000.0,
            ),
            GoalKind::Travel => ("Travel Planning", "Save for your dream vacation", 2, 300_000.0),
            GoalKind::Wedding => ("Wedding Planning", "Save for your special day", 3, 1_500_000.0),
            GoalKind::Wealth => (
                "Wealth Building",
                "Grow your wealth through systematic investments",
                15,
                3_000_000.0,
            ),
            GoalKind::Sabbatical => (
                "Sabbatical Planning",
                "Save for your career break",
                3,
                1_000_000.0,
            ),
            GoalKind::Family => (
                "Family Planning",
                "Save for your family's future needs",
                10,
                2_000_000.0,
            ),
            GoalKind::Child => (
                "Child Education Planning",
                "Save for your child's education",
                15,
                3_000_000.0,
            ),
            GoalKind::Custom => (
                "Custom Goal Planning",
                "Plan for your custom financial goal",
                5,
                1_000_000.0,
            ),
        };

        GoalProfile {
            kind: self,
            title,
            description,
            default_years,
            default_amount,
        }
    }

    pub fn catalog() -> Vec<GoalProfile> {
        Self::ALL.iter().map(|kind| kind.profile()).collect()
    }
}

/// Explicit values win, then the goal kind's defaults, then the generic ones.
pub fn resolve_target_and_years(
    kind: Option<GoalKind>,
    target: Option<f64>,
    years: Option<i64>,
) -> (f64, i64) {
    let profile = kind.map(GoalKind::profile);
    let target = target
        .or(profile.map(|p| p.default_amount))
        .unwrap_or(DEFAULT_TARGET);
    let years = years
        .or(profile.map(|p| i64::from(p.default_years)))
        .unwrap_or(DEFAULT_YEARS);
    (target, years)
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| format!("unknown goal type '{s}'"))
    }
}
