use serde::Serialize;

/// The five thematic sheets of the divorce statistics workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    /// Divorces by department and age group of the spouses.
    AgeGroups,
    /// Divorces by department and ethnic group.
    EthnicOrigin,
    /// Divorces by department and month of registration.
    Registration,
    /// Divorces by occupation of each spouse.
    Occupations,
    /// Divorces by day and month of occurrence.
    Occurrence,
}

impl SheetKind {
    pub const ALL: [SheetKind; 5] = [
        SheetKind::AgeGroups,
        SheetKind::EthnicOrigin,
        SheetKind::Registration,
        SheetKind::Occupations,
        SheetKind::Occurrence,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SheetKind::AgeGroups => "age_groups",
            SheetKind::EthnicOrigin => "ethnic_origin",
            SheetKind::Registration => "registration",
            SheetKind::Occupations => "occupations",
            SheetKind::Occurrence => "occurrence",
        }
    }

    /// Substrings (accent- and case-insensitive) that locate the worksheet.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            SheetKind::AgeGroups => &["edad", "age group"],
            SheetKind::EthnicOrigin => &["pueblo", "etnia", "grupo etnico", "ethnic"],
            SheetKind::Registration => &[
                "mes y departamento",
                "departamento de registro",
                "registro",
                "registration",
            ],
            SheetKind::Occupations => &["ocupacion", "occupation"],
            SheetKind::Occurrence => &["dia y mes", "ocurrencia", "occurrence"],
        }
    }

    /// Canonical name given to the sheet's leading label column.
    pub fn id_column(&self) -> &'static str {
        match self {
            SheetKind::AgeGroups => "department",
            SheetKind::EthnicOrigin => "department",
            SheetKind::Registration => "department",
            SheetKind::Occupations => "occupation",
            SheetKind::Occurrence => "day",
        }
    }

    /// Name of the category column produced by the wide → long reshape.
    pub fn variable_column(&self) -> &'static str {
        match self {
            SheetKind::AgeGroups => "age_group",
            SheetKind::EthnicOrigin => "ethnic_group",
            SheetKind::Registration => "month",
            SheetKind::Occupations => "spouse",
            SheetKind::Occurrence => "month",
        }
    }

    /// Name of the value column produced by the wide → long reshape.
    pub fn value_column(&self) -> &'static str {
        "divorces"
    }

    /// Whether the melted categories are month names subject to the fixed
    /// calendar ordering.
    pub fn has_month_columns(&self) -> bool {
        matches!(self, SheetKind::Registration | SheetKind::Occurrence)
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
