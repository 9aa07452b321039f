//! Configuration of a PDE solve.
//!
//! [`PdeParams`] can be built in code, deserialized from TOML, or parsed
//! from loose name/value pairs such as a spreadsheet range would provide:
//!
//! ```
//! use orf_methods::pde::PdeParams;
//!
//! let p = PdeParams::from_toml_str(
//!     r#"
//!     numberOfTimeSteps = 100
//!     numberOfSpotNodes = [50]
//!     theta = 0.5
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(p.n_time_steps, 100);
//!
//! let q = PdeParams::from_pairs([("NTimeSteps", "100"), ("nspotnodes", "50")]).unwrap();
//! assert_eq!(p.n_spot_nodes, q.n_spot_nodes);
//! ```

use super::tridiagonal::BoundaryCondition;
use orf_core::{errors::Result, Error, Real};
use serde::{Deserialize, Serialize};

/// Parameters of a PDE solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdeParams {
    /// Requested number of time steps (the partition may add fixings).
    #[serde(alias = "numberOfTimeSteps")]
    pub n_time_steps: usize,
    /// Interior spot nodes, one entry per factor.
    #[serde(alias = "numberOfSpotNodes")]
    pub n_spot_nodes: Vec<usize>,
    /// Grid half-width in standard deviations, one entry per factor.
    #[serde(alias = "numberOfStandardDeviations")]
    pub n_std_devs: Vec<Real>,
    /// Scheme weight: 0 explicit, 1 implicit, ½ Crank–Nicolson.
    pub theta: Real,
    /// Align a node to the barrier (`true`) or to the spot (`false`).
    #[serde(alias = "alignToBarrierOrSpot")]
    pub align_to_barrier: bool,
    /// Keep a snapshot of every time step in the results.
    pub store_full_grid: bool,
    /// Condition folded into the edge rows of the operators.
    pub boundary_condition: BoundaryCondition,
}

impl Default for PdeParams {
    fn default() -> Self {
        Self::with_factors(1)
    }
}

impl PdeParams {
    /// Defaults for `n_factors` factors: 1 time step, 10 spot nodes and
    /// 4 standard deviations per factor, Crank–Nicolson.
    pub fn with_factors(n_factors: usize) -> Self {
        Self {
            n_time_steps: 1,
            n_spot_nodes: vec![10; n_factors],
            n_std_devs: vec![4.0; n_factors],
            theta: 0.5,
            align_to_barrier: false,
            store_full_grid: false,
            boundary_condition: BoundaryCondition::ZeroCurvature,
        }
    }

    /// Parse a TOML document.  Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::InvalidArgument(format!("malformed PDE parameters: {e}")))
    }

    /// Parse case-insensitive name/value pairs on top of the one-factor
    /// defaults.
    ///
    /// Recognized names: `NTIMESTEPS`, `NSPOTNODES[1]`, `NSTDDEVS[1]`,
    /// `THETA`, `ALIGNTOBARRIER`, `STOREFULLGRID`, and the long names
    /// `numberOfTimeSteps`, `numberOfSpotNodes`,
    /// `numberOfStandardDeviations`, `alignToBarrierOrSpot`.
    ///
    /// # Errors
    /// `InvalidArgument` for an unknown name, an unparsable value, or a
    /// value out of range.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut p = Self::default();
        for (name, value) in pairs {
            let key = name.as_ref().trim().to_ascii_uppercase();
            let value = value.as_ref().trim();
            match key.as_str() {
                "NTIMESTEPS" | "NUMBEROFTIMESTEPS" => {
                    let n: usize = parse(&key, value)?;
                    orf_core::ensure_arg!(n > 0, "the number of time steps must be positive");
                    p.n_time_steps = n;
                }
                "NSPOTNODES" | "NSPOTNODES1" | "NUMBEROFSPOTNODES" => {
                    let n: usize = parse(&key, value)?;
                    orf_core::ensure_arg!(n > 0, "the number of spot nodes must be positive");
                    p.n_spot_nodes[0] = n;
                }
                "NSTDDEVS" | "NSTDDEVS1" | "NUMBEROFSTANDARDDEVIATIONS" => {
                    let n: Real = parse(&key, value)?;
                    orf_core::ensure_arg!(
                        n > 0.0,
                        "the number of standard deviations must be positive"
                    );
                    p.n_std_devs[0] = n;
                }
                "THETA" => {
                    let t: Real = parse(&key, value)?;
                    orf_core::ensure_arg!((0.0..=1.0).contains(&t), "theta must be between 0 and 1");
                    p.theta = t;
                }
                "ALIGNTOBARRIER" | "ALIGNTOBARRIERORSPOT" => p.align_to_barrier = parse_bool(&key, value)?,
                "STOREFULLGRID" => p.store_full_grid = parse_bool(&key, value)?,
                _ => orf_core::ensure_arg!(false, "unknown PDE parameter {key}"),
            }
        }
        Ok(p)
    }

    /// Check the parameters against the number of factors being diffused.
    pub fn validate(&self, n_factors: usize) -> Result<()> {
        orf_core::ensure_arg!(self.n_time_steps > 0, "the number of time steps must be positive");
        orf_core::ensure_arg!(
            self.n_spot_nodes.len() == n_factors,
            "unequal number of factors ({n_factors}) and spot node specs ({})",
            self.n_spot_nodes.len()
        );
        orf_core::ensure_arg!(
            self.n_std_devs.len() == n_factors,
            "unequal number of factors ({n_factors}) and std dev specs ({})",
            self.n_std_devs.len()
        );
        orf_core::ensure_arg!(
            self.n_spot_nodes.iter().all(|&n| n > 0),
            "the number of spot nodes must be positive"
        );
        orf_core::ensure_arg!(
            self.n_std_devs.iter().all(|&n| n > 0.0),
            "the number of standard deviations must be positive"
        );
        orf_core::ensure_arg!(
            (0.0..=1.0).contains(&self.theta),
            "theta must be between 0 and 1, got {}",
            self.theta
        );
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("cannot parse value '{value}' for {key}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::InvalidArgument(format!(
            "cannot parse value '{value}' for {key} as a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = PdeParams::default();
        assert_eq!(p.n_time_steps, 1);
        assert_eq!(p.n_spot_nodes, vec![10]);
        assert_eq!(p.n_std_devs, vec![4.0]);
        assert_eq!(p.theta, 0.5);
        assert!(!p.align_to_barrier);
        assert!(!p.store_full_grid);
        assert_eq!(p.boundary_condition, BoundaryCondition::ZeroCurvature);
        assert!(p.validate(1).is_ok());
        assert!(p.validate(2).is_err());
    }

    #[test]
    fn toml_names_and_aliases() {
        let p = PdeParams::from_toml_str(
            r#"
            nTimeSteps = 20
            numberOfStandardDeviations = [5.0]
            alignToBarrierOrSpot = true
            storeFullGrid = true
            boundaryCondition = { dirichlet = 0.0 }
            "#,
        )
        .unwrap();
        assert_eq!(p.n_time_steps, 20);
        assert_eq!(p.n_std_devs, vec![5.0]);
        assert_eq!(p.n_spot_nodes, vec![10]);
        assert!(p.align_to_barrier);
        assert!(p.store_full_grid);
        assert_eq!(p.boundary_condition, BoundaryCondition::Dirichlet(0.0));

        let p = PdeParams::from_toml_str(r#"boundaryCondition = "zeroCurvature""#).unwrap();
        assert_eq!(p.boundary_condition, BoundaryCondition::ZeroCurvature);
    }

    #[test]
    fn toml_round_trip() {
        let mut p = PdeParams::with_factors(1);
        p.n_time_steps = 250;
        p.theta = 1.0;
        let text = toml::to_string(&p).unwrap();
        assert_eq!(PdeParams::from_toml_str(&text).unwrap(), p);
    }

    #[test]
    fn malformed_toml() {
        assert!(matches!(
            PdeParams::from_toml_str("theta = \"half\""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn pairs() {
        let p = PdeParams::from_pairs([
            (" ntimesteps ", "100"),
            ("NSPOTNODES1", "50"),
            ("NStdDevs", "4.5"),
            ("Theta", "1"),
            ("AlignToBarrier", "TRUE"),
            ("storeFullGrid", "0"),
        ])
        .unwrap();
        assert_eq!(p.n_time_steps, 100);
        assert_eq!(p.n_spot_nodes, vec![50]);
        assert_eq!(p.n_std_devs, vec![4.5]);
        assert_eq!(p.theta, 1.0);
        assert!(p.align_to_barrier);
        assert!(!p.store_full_grid);
    }

    #[test]
    fn pair_errors() {
        assert!(PdeParams::from_pairs([("NTIMESTEPS", "0")]).is_err());
        assert!(PdeParams::from_pairs([("THETA", "1.5")]).is_err());
        assert!(PdeParams::from_pairs([("NSPOTNODES", "ten")]).is_err());
        assert!(PdeParams::from_pairs([("STOREFULLGRID", "maybe")]).is_err());
        assert!(matches!(
            PdeParams::from_pairs([("NPATHS", "1000")]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn validation() {
        let mut p = PdeParams::default();
        p.theta = -0.1;
        assert!(p.validate(1).is_err());
        let mut p = PdeParams::default();
        p.n_spot_nodes = vec![0];
        assert!(p.validate(1).is_err());
        let mut p = PdeParams::default();
        p.n_std_devs = vec![4.0, 4.0];
        assert!(p.validate(1).is_err());
    }
}
