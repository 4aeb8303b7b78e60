use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl From<OutputFormat> for reproj_core::OutputFormat {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// The `--output` flag wins; otherwise the config default applies.
pub fn resolve_output(
    flag: Option<OutputFormat>,
    config: &reproj_core::Config,
) -> reproj_core::OutputFormat {
    flag.map_or_else(
        || reproj_core::OutputFormat::from_config(&config.defaults.output),
        Into::into,
    )
}
