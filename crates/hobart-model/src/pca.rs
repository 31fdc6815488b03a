//! Principal component risk model.
//!
//! The fit centers the returns panel, eigendecomposes the sample
//! covariance and keeps the leading components as statistical factors.
//! Artifacts are computed into a complete set and swapped in together,
//! so a failed refit never leaves the model half updated.

use chrono::NaiveDate;
use ndarray::{Array1, Array2, Axis, s};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::eigen::symmetric_eigen;
use crate::error::{ModelError, Result};
use crate::panel::ReturnsPanel;

/// Trading sessions per year used to annualize daily variances.
pub const DEFAULT_ANNUALIZATION_FACTOR: f64 = 252.0;

/// Risk model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of statistical factors to extract
    pub num_components: usize,

    /// Variance annualization multiplier
    pub annualization_factor: f64,
}

impl ModelConfig {
    /// Configuration with the default annualization factor.
    pub const fn new(num_components: usize) -> Self {
        Self {
            num_components,
            annualization_factor: DEFAULT_ANNUALIZATION_FACTOR,
        }
    }
}

/// Artifacts of a successful fit.
///
/// Shapes use `n` for observation rows, `m` for securities and `k`
/// for factors.
#[derive(Debug, Clone)]
pub struct FactorArtifacts {
    /// Observation dates of the fitted panel
    pub dates: Vec<NaiveDate>,
    /// Securities of the fitted panel, in column order
    pub securities: Vec<String>,
    /// Factor loadings, `m x k`
    pub factor_betas: Array2<f64>,
    /// Factor return series, `n x k`
    pub factor_returns: Array2<f64>,
    /// Fraction of total variance captured per factor, length `k`
    pub explained_variance_ratio: Array1<f64>,
    /// Systematic part of the panel, `n x m`
    pub common_returns: Array2<f64>,
    /// Panel minus common returns, `n x m`
    pub residuals: Array2<f64>,
    /// Annualized idiosyncratic variance per security, length `m`
    pub idio_var_vector: Array1<f64>,
    /// Diagonal form of the idiosyncratic variances, `m x m`
    pub idio_var_matrix: Array2<f64>,
    /// Annualized factor covariance, `k x k` and diagonal
    pub factor_cov_matrix: Array2<f64>,
}

/// Statistical factor model fitted by PCA.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use hobart_model::{ModelConfig, ReturnsPanel, RiskModel};
/// use ndarray::array;
///
/// let dates = vec![
///     NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2019, 1, 3).unwrap(),
///     NaiveDate::from_ymd_opt(2019, 1, 4).unwrap(),
/// ];
/// let securities = vec!["AAA".to_string(), "BBB".to_string()];
/// let values = array![[0.01, -0.02], [-0.005, 0.01], [0.02, 0.005]];
/// let panel = ReturnsPanel::new(dates, securities, values)?;
///
/// let mut model = RiskModel::new(ModelConfig::new(1));
/// model.fit(&panel)?;
/// assert!(model.is_fitted());
/// # Ok::<(), hobart_model::ModelError>(())
/// ```
#[derive(Debug)]
pub struct RiskModel {
    config: ModelConfig,
    artifacts: Option<FactorArtifacts>,
}

impl RiskModel {
    /// Create an unfitted model.
    pub const fn new(config: ModelConfig) -> Self {
        Self {
            config,
            artifacts: None,
        }
    }

    /// Fit the model to a returns panel.
    ///
    /// On success the previous artifacts (if any) are replaced; on
    /// error they are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NonFinite`] when the panel contains NaN
    /// or infinite cells, [`ModelError::InsufficientData`] for fewer
    /// than 2 rows, [`ModelError::InvalidComponents`] when the
    /// component count is outside `1..=n_securities`, and
    /// [`ModelError::NotConverged`] if the eigendecomposition
    /// exhausts its sweep budget.
    pub fn fit(&mut self, panel: &ReturnsPanel) -> Result<()> {
        let artifacts = self.compute_artifacts(panel)?;
        self.artifacts = Some(artifacts);
        Ok(())
    }

    fn compute_artifacts(&self, panel: &ReturnsPanel) -> Result<FactorArtifacts> {
        let values = panel.values();
        let n_rows = values.nrows();
        let n_securities = values.ncols();
        let k = self.config.num_components;

        if values.iter().any(|x| !x.is_finite()) {
            return Err(ModelError::NonFinite);
        }
        if n_rows < 2 {
            return Err(ModelError::InsufficientData { rows: n_rows });
        }
        if k == 0 || k > n_securities {
            return Err(ModelError::InvalidComponents {
                requested: k,
                securities: n_securities,
            });
        }

        let means = values.sum_axis(Axis(0)) / n_rows as f64;
        let centered = values - &means;
        let covariance = centered.t().dot(&centered) / (n_rows as f64 - 1.0);

        let eigen = symmetric_eigen(&covariance)?;
        let factor_betas = eigen.eigenvectors.slice(s![.., ..k]).to_owned();
        let factor_returns = centered.dot(&factor_betas);

        let trace = covariance.diag().sum();
        let explained_variance_ratio = if trace > 0.0 {
            eigen.eigenvalues.slice(s![..k]).mapv(|v| v / trace)
        } else {
            Array1::zeros(k)
        };

        let common_returns = factor_returns.dot(&factor_betas.t());
        let residuals = values - &common_returns;

        let annualization = self.config.annualization_factor;
        let idio_var_vector = column_variances(&residuals, n_rows as f64) * annualization;
        let idio_var_matrix = Array2::from_diag(&idio_var_vector);
        let factor_variances =
            column_variances(&factor_returns, n_rows as f64 - 1.0) * annualization;
        let factor_cov_matrix = Array2::from_diag(&factor_variances);

        Ok(FactorArtifacts {
            dates: panel.dates().to_vec(),
            securities: panel.securities().to_vec(),
            factor_betas,
            factor_returns,
            explained_variance_ratio,
            common_returns,
            residuals,
            idio_var_vector,
            idio_var_matrix,
            factor_cov_matrix,
        })
    }

    /// Whether a fit has completed successfully.
    pub const fn is_fitted(&self) -> bool {
        self.artifacts.is_some()
    }

    /// Model configuration.
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Full artifact set from the last successful fit.
    pub const fn artifacts(&self) -> Option<&FactorArtifacts> {
        self.artifacts.as_ref()
    }

    /// Factor loadings, securities by factors.
    pub fn factor_betas(&self) -> Option<&Array2<f64>> {
        self.artifacts.as_ref().map(|a| &a.factor_betas)
    }

    /// Factor return series, dates by factors.
    pub fn factor_returns(&self) -> Option<&Array2<f64>> {
        self.artifacts.as_ref().map(|a| &a.factor_returns)
    }

    /// Fraction of total variance captured per factor.
    pub fn explained_variance_ratio(&self) -> Option<&Array1<f64>> {
        self.artifacts.as_ref().map(|a| &a.explained_variance_ratio)
    }

    /// Systematic part of the fitted panel.
    pub fn common_returns(&self) -> Option<&Array2<f64>> {
        self.artifacts.as_ref().map(|a| &a.common_returns)
    }

    /// Fitted panel minus its common returns.
    pub fn residuals(&self) -> Option<&Array2<f64>> {
        self.artifacts.as_ref().map(|a| &a.residuals)
    }

    /// Annualized idiosyncratic variance per security.
    pub fn idio_var_vector(&self) -> Option<&Array1<f64>> {
        self.artifacts.as_ref().map(|a| &a.idio_var_vector)
    }

    /// Annualized idiosyncratic variances as a diagonal matrix.
    pub fn idio_var_matrix(&self) -> Option<&Array2<f64>> {
        self.artifacts.as_ref().map(|a| &a.idio_var_matrix)
    }

    /// Annualized factor covariance matrix.
    pub fn factor_cov_matrix(&self) -> Option<&Array2<f64>> {
        self.artifacts.as_ref().map(|a| &a.factor_cov_matrix)
    }

    /// Securities of the fitted panel, in column order.
    pub fn securities(&self) -> Option<&[String]> {
        self.artifacts.as_ref().map(|a| a.securities.as_slice())
    }

    /// Observation dates of the fitted panel.
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.artifacts.as_ref().map(|a| a.dates.as_slice())
    }

    /// Aggregate factor exposures for a weighted portfolio.
    ///
    /// Returns the k-vector `betasᵀ·w` over the named securities.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFitted`] before a successful fit and
    /// [`ModelError::UnknownSecurity`] when a weight names a security
    /// outside the fitted universe.
    pub fn factor_exposures(&self, weights: &[(String, f64)]) -> Result<Array1<f64>> {
        let artifacts = self.artifacts.as_ref().ok_or(ModelError::NotFitted)?;
        let mut exposures = Array1::<f64>::zeros(artifacts.factor_betas.ncols());
        for (security, weight) in weights {
            let index = artifacts
                .securities
                .iter()
                .position(|s| s == security)
                .ok_or_else(|| ModelError::UnknownSecurity(security.clone()))?;
            exposures.scaled_add(*weight, &artifacts.factor_betas.row(index));
        }
        Ok(exposures)
    }

    /// Factor loadings as a DataFrame, one row per security.
    ///
    /// Columns are `security` followed by the factor labels `1..=k`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFitted`] before a successful fit.
    pub fn betas_frame(&self) -> Result<DataFrame> {
        let artifacts = self.artifacts.as_ref().ok_or(ModelError::NotFitted)?;
        let mut columns = vec![Column::new(
            "security".into(),
            artifacts.securities.clone(),
        )];
        for j in 0..artifacts.factor_betas.ncols() {
            columns.push(Column::new(
                (j + 1).to_string().into(),
                artifacts.factor_betas.column(j).to_vec(),
            ));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Factor return series as a DataFrame, one row per date.
    ///
    /// Columns are `date` (ISO strings) followed by the factor labels
    /// `1..=k`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFitted`] before a successful fit.
    pub fn factor_returns_frame(&self) -> Result<DataFrame> {
        let artifacts = self.artifacts.as_ref().ok_or(ModelError::NotFitted)?;
        let dates: Vec<String> = artifacts.dates.iter().map(ToString::to_string).collect();
        let mut columns = vec![Column::new("date".into(), dates)];
        for j in 0..artifacts.factor_returns.ncols() {
            columns.push(Column::new(
                (j + 1).to_string().into(),
                artifacts.factor_returns.column(j).to_vec(),
            ));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Explained variance ratios as a DataFrame, one row per factor.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFitted`] before a successful fit.
    pub fn explained_variance_frame(&self) -> Result<DataFrame> {
        let artifacts = self.artifacts.as_ref().ok_or(ModelError::NotFitted)?;
        let labels: Vec<String> = (1..=artifacts.explained_variance_ratio.len())
            .map(|j| j.to_string())
            .collect();
        let frame = DataFrame::new(vec![
            Column::new("factor".into(), labels),
            Column::new(
                "explained_variance_ratio".into(),
                artifacts.explained_variance_ratio.to_vec(),
            ),
        ])?;
        Ok(frame)
    }
}

/// Per-column variance around the column mean with an explicit
/// denominator.
fn column_variances(matrix: &Array2<f64>, denominator: f64) -> Array1<f64> {
    let n_rows = matrix.nrows() as f64;
    let mut variances = Array1::<f64>::zeros(matrix.ncols());
    for j in 0..matrix.ncols() {
        let column = matrix.column(j);
        let mean = column.sum() / n_rows;
        let squared: f64 = column.iter().map(|x| (x - mean).powi(2)).sum();
        variances[j] = squared / denominator;
    }
    variances
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn sample_dates(count: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        (0..count)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn sample_securities() -> Vec<String> {
        vec!["AAA".to_string(), "BBB".to_string(), "CCC".to_string()]
    }

    /// Panel driven by two latent sinusoidal factors plus a small
    /// deterministic perturbation per security.
    fn sample_panel() -> ReturnsPanel {
        let n_dates = 100;
        let loadings = [[0.9, 0.1], [0.5, -0.4], [0.2, 0.8]];
        let mut values = Array2::<f64>::zeros((n_dates, 3));
        for t in 0..n_dates {
            let time = t as f64;
            let market = 0.01 * (time * 0.35).sin();
            let spread = 0.006 * (time * 0.8).cos();
            for (i, load) in loadings.iter().enumerate() {
                let noise = 0.0005 * ((time + 7.0 * i as f64) * 2.3).sin();
                values[[t, i]] = load[0] * market + load[1] * spread + noise;
            }
        }
        ReturnsPanel::new(sample_dates(n_dates), sample_securities(), values).unwrap()
    }

    fn fitted_model() -> RiskModel {
        let mut model = RiskModel::new(ModelConfig::new(2));
        model.fit(&sample_panel()).unwrap();
        model
    }

    #[test]
    fn test_artifact_shapes() {
        let model = fitted_model();
        assert!(model.is_fitted());
        assert_eq!(model.factor_betas().unwrap().dim(), (3, 2));
        assert_eq!(model.factor_returns().unwrap().dim(), (100, 2));
        assert_eq!(model.explained_variance_ratio().unwrap().len(), 2);
        assert_eq!(model.common_returns().unwrap().dim(), (100, 3));
        assert_eq!(model.residuals().unwrap().dim(), (100, 3));
        assert_eq!(model.idio_var_vector().unwrap().len(), 3);
        assert_eq!(model.idio_var_matrix().unwrap().dim(), (3, 3));
        assert_eq!(model.factor_cov_matrix().unwrap().dim(), (2, 2));
        assert_eq!(model.securities().unwrap().len(), 3);
        assert_eq!(model.dates().unwrap().len(), 100);
    }

    #[test]
    fn test_unfitted_accessors_are_empty() {
        let model = RiskModel::new(ModelConfig::new(2));
        assert!(!model.is_fitted());
        assert!(model.factor_betas().is_none());
        assert!(model.explained_variance_ratio().is_none());
        assert!(matches!(model.betas_frame(), Err(ModelError::NotFitted)));
        assert!(matches!(
            model.factor_exposures(&[("AAA".to_string(), 1.0)]),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_common_plus_residual_reconstructs_panel() {
        let panel = sample_panel();
        let mut model = RiskModel::new(ModelConfig::new(2));
        model.fit(&panel).unwrap();

        let common = model.common_returns().unwrap();
        let residuals = model.residuals().unwrap();
        for t in 0..panel.n_dates() {
            for i in 0..panel.n_securities() {
                assert_relative_eq!(
                    common[[t, i]] + residuals[[t, i]],
                    panel.values()[[t, i]],
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_explained_variance_is_descending_and_bounded() {
        let model = fitted_model();
        let ratios = model.explained_variance_ratio().unwrap();
        assert!(ratios[0] >= ratios[1]);
        assert!(ratios[1] > 0.0);
        let total: f64 = ratios.sum();
        assert!(total > 0.9, "two factors should dominate, got {}", total);
        assert!(total <= 1.0 + 1e-9);
    }

    #[test]
    fn test_beta_columns_lead_with_positive_entries() {
        let model = fitted_model();
        let betas = model.factor_betas().unwrap();
        for j in 0..betas.ncols() {
            let lead = betas
                .column(j)
                .iter()
                .fold(0.0_f64, |acc, &x| if x.abs() > acc.abs() { x } else { acc });
            assert!(lead > 0.0);
        }
    }

    #[test]
    fn test_factor_cov_is_diagonal_sample_variance() {
        let model = fitted_model();
        let cov = model.factor_cov_matrix().unwrap();
        assert_eq!(cov[[0, 1]], 0.0);
        assert_eq!(cov[[1, 0]], 0.0);

        let factor_returns = model.factor_returns().unwrap();
        let column = factor_returns.column(0);
        let mean = column.sum() / column.len() as f64;
        let sample_var: f64 = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / (column.len() as f64 - 1.0);
        assert_relative_eq!(cov[[0, 0]], sample_var * 252.0, epsilon = 1e-12);
    }

    #[test]
    fn test_idio_var_is_population_variance() {
        let model = fitted_model();
        let idio = model.idio_var_vector().unwrap();
        let residuals = model.residuals().unwrap();

        let column = residuals.column(0);
        let mean = column.sum() / column.len() as f64;
        let population_var: f64 =
            column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / column.len() as f64;
        assert_relative_eq!(idio[0], population_var * 252.0, epsilon = 1e-12);

        let matrix = model.idio_var_matrix().unwrap();
        assert_relative_eq!(matrix[[0, 0]], idio[0], epsilon = 1e-15);
        assert_eq!(matrix[[0, 1]], 0.0);
    }

    #[test]
    fn test_non_finite_panel_is_loud() {
        let mut values = Array2::<f64>::zeros((5, 3));
        values[[2, 1]] = f64::NAN;
        let panel = ReturnsPanel::new(sample_dates(5), sample_securities(), values).unwrap();

        let mut model = RiskModel::new(ModelConfig::new(1));
        assert!(matches!(model.fit(&panel), Err(ModelError::NonFinite)));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_single_row_is_loud() {
        let panel = ReturnsPanel::new(
            sample_dates(1),
            sample_securities(),
            Array2::zeros((1, 3)),
        )
        .unwrap();
        let mut model = RiskModel::new(ModelConfig::new(1));
        assert!(matches!(
            model.fit(&panel),
            Err(ModelError::InsufficientData { rows: 1 })
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    fn test_component_bounds_are_loud(#[case] requested: usize) {
        let mut model = RiskModel::new(ModelConfig::new(requested));
        assert!(matches!(
            model.fit(&sample_panel()),
            Err(ModelError::InvalidComponents { securities: 3, .. })
        ));
    }

    #[test]
    fn test_failed_refit_keeps_previous_artifacts() {
        let mut model = fitted_model();
        let before = model.explained_variance_ratio().unwrap()[0];

        let mut values = Array2::<f64>::zeros((5, 3));
        values[[0, 0]] = f64::INFINITY;
        let bad = ReturnsPanel::new(sample_dates(5), sample_securities(), values).unwrap();
        assert!(model.fit(&bad).is_err());

        assert!(model.is_fitted());
        assert_eq!(model.explained_variance_ratio().unwrap()[0], before);
    }

    #[test]
    fn test_factor_exposures() {
        let model = fitted_model();
        let betas = model.factor_betas().unwrap().clone();
        let weights = vec![("AAA".to_string(), 0.5), ("CCC".to_string(), 0.5)];

        let exposures = model.factor_exposures(&weights).unwrap();
        for j in 0..2 {
            let expected = 0.5 * betas[[0, j]] + 0.5 * betas[[2, j]];
            assert_relative_eq!(exposures[j], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unknown_security_is_loud() {
        let model = fitted_model();
        let weights = vec![("ZZZ".to_string(), 1.0)];
        assert!(matches!(
            model.factor_exposures(&weights),
            Err(ModelError::UnknownSecurity(s)) if s == "ZZZ"
        ));
    }

    #[test]
    fn test_betas_frame_layout() {
        let model = fitted_model();
        let frame = model.betas_frame().unwrap();
        let names: Vec<&str> = frame.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["security", "1", "2"]);
        assert_eq!(frame.height(), 3);
    }

    #[test]
    fn test_factor_returns_frame_layout() {
        let model = fitted_model();
        let frame = model.factor_returns_frame().unwrap();
        let names: Vec<&str> = frame.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["date", "1", "2"]);
        assert_eq!(frame.height(), 100);
        let first = frame.column("date").unwrap().str().unwrap().get(0);
        assert_eq!(first, Some("2019-01-02"));
    }

    #[test]
    fn test_explained_variance_frame_layout() {
        let model = fitted_model();
        let frame = model.explained_variance_frame().unwrap();
        assert_eq!(frame.shape(), (2, 2));
        let labels = frame.column("factor").unwrap().str().unwrap();
        assert_eq!(labels.get(0), Some("1"));
        assert_eq!(labels.get(1), Some("2"));
    }
}
