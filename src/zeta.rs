//! Riemann zeta reference data and the two classical series for ζ(s).
//!
//! The zero heights τ of the first nontrivial zeros `1/2 + iτ` are stored as
//! exact decimal strings and parsed once, on first use, into `f64`. They are
//! comparison ground truth only; nothing in this crate computes them.

use crate::{
    comparison::relative_error,
    error::{SpectralError, SpectralErrorKind},
    primes::generate_primes,
};
use serde::Serialize;
use std::{f64::consts::PI, sync::OnceLock};

/// ζ(2) = π²/6.
pub const ZETA_2: f64 = PI * PI / 6.0;

/// Lower edge `V₀ + 1/4` of the continuous spectrum of the radial operator,
/// with `V₀ = 1/2`.
pub const RADIAL_SPECTRUM_FLOOR: f64 = 0.75;

/// Heights of the first 20 nontrivial zeros of ζ, to 100 significant digits.
pub const REFERENCE_ZERO_HEIGHTS: [&str; 20] = [
    "14.134725141734693790457251983562470270784257115699243175685567460149963429809256764949010393171561",
    "21.022039638771554992628479944487859826167069213050207026806076815378740320549024264369743779009350",
    "25.010857580145688763213790992562821818659549672891308558823667697238662996700103912054146875843351",
    "30.424876125955026978648178873734434017775352334216037374993617983226963086568421506816568748507169",
    "32.935061587739189690422552994968502850618451823978829628043685169648873094901470074168610450421633",
    "37.586178158825671257217763480705332821405597350830793218329317009767516816308883051220646819515127",
    "40.918719012147495187398126914633254395726156823905096507350061324494265522147050993087242574862862",
    "43.327073280914999519496122165398346748861889162067873742148262325901502154265506813080969165814134",
    "48.005150881167159727942472749427516155333659788041188134905863089842901742976644433726341081756968",
    "49.773832477672302181916784678563484638640074189652086348950088425559806274721327058166095899914304",
    "52.970321477714460644699780434825815103965653089302140737001577456845015378015761104468046002088046",
    "56.446247697063239138098088978728404127468468667316509686045838062502816788423003037503353439905180",
    "59.347044003544594686424896945745925094178149715374318659169984705923952032157039994655793948394990",
    "60.831778524671306441525743416656154447635710037203715671830012737306133316815395669633644097537015",
    "65.112544048688726211164380001936998073943095653041503946901309449081007066568761830946027796932346",
    "67.079810529494152847833076374127895308203705095663081736962341862978844143362721616598117264896007",
    "69.546401711745611420228721019842618568897084063090097399983251169568350000127710598816825936879726",
    "72.067157674546953653493270066131037467124920298844838827133715780639509267527077072996983090493329",
    "75.704690699808707844438426325962058817076905838577896075506062936095397529087327915161076845606628",
    "77.144840068874847888302002845641050175799449621481158623142825969736019481049816007509072624827113",
];

/// [`REFERENCE_ZERO_HEIGHTS`] as correctly rounded `f64` values.
pub fn reference_zero_heights() -> &'static [f64] {
    static HEIGHTS: OnceLock<Vec<f64>> = OnceLock::new();
    HEIGHTS.get_or_init(|| {
        REFERENCE_ZERO_HEIGHTS
            .iter()
            .map(|s| {
                s.parse::<f64>()
                    .expect("reference zero heights are valid decimal literals")
            })
            .collect()
    })
}

/// The eigenvalue `τ² + 1/2` the radial operator is expected to have for a
/// zero at height `τ`.
pub fn predicted_radial_eigenvalue(tau: f64) -> f64 {
    tau * tau + 0.5
}

/// Mean spacing `2π / ln(t / 2π)` between consecutive zeros near height `t`.
///
/// Only meaningful for `t > 2π`.
pub fn mean_zero_spacing(height: f64) -> f64 {
    2.0 * PI / (height / (2.0 * PI)).ln()
}

/// Partial Dirichlet series `Σ_{n=1}^{limit} n^(-s)`.
pub fn dirichlet_sum(s: f64, limit: usize) -> f64 {
    if s <= 1.0 {
        log::warn!("Dirichlet series for s = {s} does not converge (requires s > 1)");
    }
    (1..=limit).map(|n| (n as f64).powf(-s)).sum()
}

/// Partial Euler product `Π_{p <= limit} 1 / (1 - p^(-s))`.
pub fn euler_product(s: f64, limit: usize) -> f64 {
    if s <= 1.0 {
        log::warn!("Euler product for s = {s} does not converge (requires s > 1)");
    }
    generate_primes(limit)
        .into_iter()
        .map(|p| 1.0 / (1.0 - (p as f64).powf(-s)))
        .product()
}

/// Outcome of comparing the Dirichlet series with the Euler product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZetaIdentityCheck {
    pub s: f64,
    pub dirichlet_value: f64,
    pub euler_value: f64,
    /// ζ(s) in closed form; only known here for `s == 2`.
    pub exact_value: Option<f64>,
    /// `|dirichlet - exact| / |exact|`, when `exact_value` is known.
    pub dirichlet_error: Option<f64>,
    /// `|euler - exact| / |exact|`, when `exact_value` is known.
    pub euler_error: Option<f64>,
    /// `|dirichlet - euler| / |reference|`, where the reference is
    /// `exact_value` when known and the Dirichlet value otherwise.
    pub identity_error: f64,
    pub passed: bool,
}

/// Evaluates both partial representations of ζ(s) and checks that they agree
/// to within `tolerance` relative error.
///
/// The relative error is taken against the exact ζ(2) = π²/6 at `s = 2`. For
/// other arguments no closed form is available here, so the partial Dirichlet
/// sum serves as the reference.
///
/// # Errors
/// * [`SpectralErrorKind::InputError`] for a non-finite `s`, or when either
///   partial representation overflows.
/// * [`SpectralErrorKind::InsufficientData`] when `terms == 0`.
/// * [`SpectralErrorKind::ZeroReference`] if the reference value is zero.
pub fn check_zeta_identity(
    s: f64,
    terms: usize,
    prime_limit: usize,
    tolerance: f64,
) -> Result<ZetaIdentityCheck, SpectralError> {
    if !s.is_finite() {
        return Err(SpectralErrorKind::InputError(format!("s must be finite, got {s}")).into());
    }
    if terms == 0 {
        return Err(SpectralErrorKind::InsufficientData {
            needed: 1,
            actual: 0,
        }
        .into());
    }

    let dirichlet_value = dirichlet_sum(s, terms);
    let euler_value = euler_product(s, prime_limit);
    if !(dirichlet_value.is_finite() && euler_value.is_finite()) {
        return Err(SpectralErrorKind::InputError(format!(
            "partial representations of zeta({s}) are not finite: Dirichlet {dirichlet_value}, Euler {euler_value}"
        ))
        .into());
    }

    let exact_value = (s == 2.0).then_some(ZETA_2);
    let reference = exact_value.unwrap_or(dirichlet_value);
    if reference == 0.0 {
        return Err(SpectralErrorKind::ZeroReference.into());
    }
    let identity_error = (dirichlet_value - euler_value).abs() / reference.abs();
    let (dirichlet_error, euler_error) = match exact_value {
        Some(exact) => (
            Some(relative_error(dirichlet_value, exact)?),
            Some(relative_error(euler_value, exact)?),
        ),
        None => (None, None),
    };

    Ok(ZetaIdentityCheck {
        s,
        dirichlet_value,
        euler_value,
        exact_value,
        dirichlet_error,
        euler_error,
        identity_error,
        passed: identity_error < tolerance,
    })
}
