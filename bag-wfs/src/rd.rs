//! Rijksdriehoeksmeting (RD New, EPSG:28992) vers WGS84
//!
//! Approximation polynomiale publiée (Schreutelkamp & Strang van Hees).
//! Précision de l'ordre du mètre sur le territoire néerlandais, dégradée
//! au-delà ; aucune validation du domaine n'est faite.

/// Origine RD (Amersfoort) en coordonnées projetées
pub const X0: f64 = 155000.0;
pub const Y0: f64 = 463000.0;

/// Origine RD en degrés
pub const PHI0: f64 = 52.15517440;
pub const LAM0: f64 = 5.38720621;

/// Facteur d'échelle appliqué aux décalages
const SCALE: f64 = 1e-5;

/// Coefficients de latitude : (puissance de dX, puissance de dY, coefficient en secondes d'arc)
const PHI_TERMS: [(i32, i32, f64); 7] = [
    (0, 1, 3235.65389),
    (2, 0, -32.58297),
    (0, 2, -0.24750),
    (2, 1, -0.84978),
    (0, 3, -0.06550),
    (2, 2, -0.01709),
    (4, 0, -0.00738),
];

/// Coefficients de longitude
const LAM_TERMS: [(i32, i32, f64); 7] = [
    (1, 0, 5260.52916),
    (1, 1, 105.94684),
    (1, 2, 2.45656),
    (3, 0, -0.81885),
    (1, 3, 0.05594),
    (3, 1, -0.05607),
    (1, 4, 0.01199),
];

/// Point géodésique en degrés décimaux
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
}

/// Évalue un polynôme en (dX, dY), résultat en secondes d'arc
fn evaluate(terms: &[(i32, i32, f64)], dx: f64, dy: f64) -> f64 {
    terms
        .iter()
        .map(|&(px, py, coef)| coef * dx.powi(px) * dy.powi(py))
        .sum()
}

/// Convertit des coordonnées RD en latitude/longitude WGS84
///
/// Fonction totale : NaN et infinis se propagent sans garde.
pub fn to_geodetic(x: f64, y: f64) -> Geodetic {
    let dx = (x - X0) * SCALE;
    let dy = (y - Y0) * SCALE;

    let phi = evaluate(&PHI_TERMS, dx, dy);
    let lam = evaluate(&LAM_TERMS, dx, dy);

    Geodetic {
        latitude: PHI0 + phi / 3600.0,
        longitude: LAM0 + lam / 3600.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_exact() {
        let geo = to_geodetic(X0, Y0);
        assert_eq!(geo.latitude, 52.15517440);
        assert_eq!(geo.longitude, 5.38720621);
    }

    #[test]
    fn test_rotterdam() {
        // Coolsingel
        let geo = to_geodetic(92500.0, 437000.0);
        assert!((geo.latitude - 51.917972).abs() < 1e-6, "lat={}", geo.latitude);
        assert!((geo.longitude - 4.478728).abs() < 1e-6, "lon={}", geo.longitude);
    }

    #[test]
    fn test_amsterdam() {
        // Dam
        let geo = to_geodetic(121000.0, 487000.0);
        assert!((geo.latitude - 52.369828).abs() < 1e-6, "lat={}", geo.latitude);
        assert!((geo.longitude - 4.887973).abs() < 1e-6, "lon={}", geo.longitude);
    }

    #[test]
    fn test_meridian_through_origin() {
        // dX = 0 : tous les termes de longitude s'annulent
        let geo = to_geodetic(X0, 563000.0);
        assert_eq!(geo.longitude, LAM0);
        assert!((geo.latitude - 53.053880).abs() < 1e-6, "lat={}", geo.latitude);
    }

    #[test]
    fn test_deterministic() {
        let a = to_geodetic(121234.5, 487654.3);
        let b = to_geodetic(121234.5, 487654.3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nan_propagates() {
        let geo = to_geodetic(f64::NAN, Y0);
        assert!(geo.latitude.is_nan());
        assert!(geo.longitude.is_nan());
    }
}
