use std::fmt;

// ---------------------------------------------------------------------------
// Method catalog
// ---------------------------------------------------------------------------

/// Analysis methods offered to the user, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    HandlingMissingValues,
    LogarithmicTransformation,
    PearsonCorrelation,
    EstimateLag,
    Ewma,
    ChangePointAnalysis,
    Arima,
    LinearModel,
    GeneralizedLinearModel,
    XgBoost,
    SirModel,
}

/// Which column fields a method sends along with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnShape {
    /// `columnX` + `columnY`.
    TwoColumn,
    /// `column`; the second column picker is hidden.
    SingleColumn,
    /// File only. Request fields for these methods are not defined yet.
    FileOnly,
}

/// Service route a request is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Correlation,
    /// Shared by every method without a dedicated route.
    Fallback,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Correlation => "/correlation",
            Endpoint::Fallback => "/ewma",
        }
    }
}

/// One row of the dispatch table.
#[derive(Debug)]
pub struct MethodSpec {
    pub method: Method,
    pub name: &'static str,
    pub shape: ColumnShape,
    pub endpoint: Endpoint,
    pub result_label: &'static str,
}

const GENERIC_LABEL: &str = "Analysis Result:";

const fn file_only(method: Method, name: &'static str) -> MethodSpec {
    MethodSpec {
        method,
        name,
        shape: ColumnShape::FileOnly,
        endpoint: Endpoint::Fallback,
        result_label: GENERIC_LABEL,
    }
}

/// Request shape, route and result label for every method. Indexed by
/// `Method as usize`, so the order must match the enum.
static CATALOG: [MethodSpec; 11] = [
    file_only(Method::HandlingMissingValues, "Handling Missing Values"),
    file_only(Method::LogarithmicTransformation, "Logarithmic Transformation"),
    MethodSpec {
        method: Method::PearsonCorrelation,
        name: "Karl Pearson's Correlation",
        shape: ColumnShape::TwoColumn,
        endpoint: Endpoint::Correlation,
        result_label: "Correlation Result:",
    },
    file_only(Method::EstimateLag, "Estimate Lag"),
    MethodSpec {
        method: Method::Ewma,
        name: "Exponentially Weighted Moving Average (EWMA)",
        shape: ColumnShape::SingleColumn,
        endpoint: Endpoint::Fallback,
        result_label: "EWMA Result:",
    },
    file_only(Method::ChangePointAnalysis, "Change Point Analysis"),
    file_only(Method::Arima, "ARIMA Model"),
    file_only(Method::LinearModel, "Linear Model(LM)"),
    file_only(Method::GeneralizedLinearModel, "Generalized Linear Model(GLM)"),
    file_only(Method::XgBoost, "XGBoost"),
    file_only(Method::SirModel, "Sir Model"),
];

impl Method {
    pub const ALL: [Method; 11] = [
        Method::HandlingMissingValues,
        Method::LogarithmicTransformation,
        Method::PearsonCorrelation,
        Method::EstimateLag,
        Method::Ewma,
        Method::ChangePointAnalysis,
        Method::Arima,
        Method::LinearModel,
        Method::GeneralizedLinearModel,
        Method::XgBoost,
        Method::SirModel,
    ];

    pub fn spec(self) -> &'static MethodSpec {
        &CATALOG[self as usize]
    }

    /// Display name, also the identifier the service knows the method by.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn shape(self) -> ColumnShape {
        self.spec().shape
    }

    pub fn endpoint(self) -> Endpoint {
        self.spec().endpoint
    }

    pub fn result_label(self) -> &'static str {
        self.spec().result_label
    }

    pub fn needs_secondary(self) -> bool {
        self.shape() == ColumnShape::TwoColumn
    }

    /// Whether the second column picker is shown at all.
    pub fn shows_secondary(self) -> bool {
        self.shape() != ColumnShape::SingleColumn
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
