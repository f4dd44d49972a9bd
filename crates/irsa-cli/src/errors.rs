use console::style;
use irsa_core::IrsaError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Print a command failure, with suggestions when the cause is recognized
pub fn report(err: &anyhow::Error) {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        cli_err.display();
        return;
    }

    if let Some(irsa_err) = err.downcast_ref::<IrsaError>() {
        if let Some(cli_err) = explain(irsa_err) {
            cli_err.display();
            return;
        }
    }

    let causes: Vec<String> = err.chain().skip(1).map(|cause| cause.to_string()).collect();
    let mut cli_err = CliError::new(err.to_string());
    if !causes.is_empty() {
        cli_err = cli_err.with_context(format!("Caused by: {}", causes.join(": ")));
    }
    cli_err.display();
}

/// Map library errors users can act on to a guided message
fn explain(err: &IrsaError) -> Option<CliError> {
    match err {
        IrsaError::InvalidSpatial { value } => Some(invalid_spatial(value)),
        IrsaError::CatalogNotFound { catalog } => Some(catalog_not_found(catalog)),
        IrsaError::MalformedCoordinates => Some(malformed_coordinates()),
        IrsaError::LimitExceeded => Some(limit_exceeded()),
        IrsaError::Units { input } => Some(bad_dimension(input)),
        _ => None,
    }
}

/// Create error for an unknown search shape
pub fn invalid_spatial(value: &str) -> CliError {
    CliError::new("Unrecognized search shape")
        .with_context(format!(
            "'{}' is not a Gator search shape. Shape names are case sensitive.",
            value
        ))
        .with_suggestion("Use one of: --spatial Cone, Box, Polygon, All-Sky")
        .with_help("Run: irsa query --help")
}

/// Create error for a catalog IRSA does not know
pub fn catalog_not_found(catalog: &str) -> CliError {
    CliError::new("Catalog not found")
        .with_context(format!("IRSA has no catalog named '{}'.", catalog))
        .with_suggestion("List available catalogs: irsa catalogs")
        .with_suggestion("Search by keyword: irsa catalogs --filter 2mass")
        .with_help("Run: irsa catalogs --help")
}

/// Create error for a position IRSA could not resolve
pub fn malformed_coordinates() -> CliError {
    CliError::new("Cannot resolve the search position")
        .with_context("IRSA rejected the coordinates or could not resolve the object name.")
        .with_suggestion("Check the object name spelling (e.g., m31, NGC 224)")
        .with_suggestion("Or give a position: \"00h42m44.3s +41d16m07.5s\" or \"10.68 41.27\"")
        .with_help("Run: irsa query --help")
}

/// Create error for a result larger than the service allows
pub fn limit_exceeded() -> CliError {
    CliError::new("Output table size limit exceeded")
        .with_context("The search matched more rows than IRSA will return.")
        .with_suggestion("Use a smaller --radius or --width")
        .with_suggestion("Or lower the row limit: --row-limit 100")
        .with_help("Run: irsa query --help")
}

/// Create error for an angle that cannot be read
pub fn bad_dimension(input: &str) -> CliError {
    CliError::new("Cannot read angular size")
        .with_context(format!("'{}' is not an angle with a recognized unit.", input))
        .with_suggestion("Use a number with a unit: 2arcmin, 30arcsec, 0.5deg, 5d0m0s")
        .with_help("Run: irsa query --help")
}

/// Create error for a region search without a center
pub fn missing_coordinates(spatial: &str) -> CliError {
    CliError::new("Search position required")
        .with_context(format!("A {} search needs an object name or a position.", spatial))
        .with_suggestion("Add a position: irsa query fp_psc m31 --radius 2arcmin")
        .with_suggestion("Or search the whole sky: --spatial All-Sky")
        .with_help("Run: irsa query --help")
}
