use std::path::PathBuf;

/// Attribute names read from and written to feature properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub peak_elevation: String,
    pub contour_elevation: String,
    /// Integer identifier; the load position is used when a contour lacks it
    pub contour_id: String,
    /// Deduplication key; measured from the geometry when absent
    pub contour_length: String,
    pub prominence: String,
    pub containing_contour: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames {
            peak_elevation: "GRID_CODE".to_string(),
            contour_elevation: "CONTOUR".to_string(),
            contour_id: "ORIG_FID".to_string(),
            contour_length: "Shape_leng".to_string(),
            prominence: "prom".to_string(),
            containing_contour: "containing_contour_id".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub peaks: PathBuf,
    pub contours: PathBuf,
    /// Canonical contour set, written before the search starts
    pub contours_out: PathBuf,
    pub peaks_out: PathBuf,
    pub fields: FieldNames,
}

impl RunConfig {
    pub fn new(peaks: impl Into<PathBuf>, contours: impl Into<PathBuf>) -> Self {
        RunConfig {
            peaks: peaks.into(),
            contours: contours.into(),
            contours_out: PathBuf::from("contours_for_calc_OUT.geojson"),
            peaks_out: PathBuf::from("peaks_with_prominence.geojson"),
            fields: FieldNames::default(),
        }
    }

    pub fn with_outputs(mut self, contours_out: impl Into<PathBuf>, peaks_out: impl Into<PathBuf>) -> Self {
        self.contours_out = contours_out.into();
        self.peaks_out = peaks_out.into();
        self
    }

    pub fn with_fields(mut self, fields: FieldNames) -> Self {
        self.fields = fields;
        self
    }
}
