use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "mbxsync",
    about = "Reconcile the mailboxes of two mail profiles so each holds the union of both",
    version
)]
pub struct Cli {
    /// Root of the first profile
    #[arg(value_name = "PROFILE1")]
    pub profile1: PathBuf,

    /// Root of the second profile
    #[arg(value_name = "PROFILE2")]
    pub profile2: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parse_two_profiles() {
        let cli = Cli::try_parse_from(["mbxsync", "/a/profile", "/b/profile"]).unwrap();
        assert_eq!(cli.profile1, PathBuf::from("/a/profile"));
        assert_eq!(cli.profile2, PathBuf::from("/b/profile"));
    }

    #[test]
    fn missing_profile_is_a_usage_error() {
        let err = Cli::try_parse_from(["mbxsync", "/a/profile"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_arguments_is_a_usage_error() {
        let err = Cli::try_parse_from(["mbxsync"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn extra_argument_is_rejected() {
        assert!(Cli::try_parse_from(["mbxsync", "a", "b", "c"]).is_err());
    }

    #[test]
    fn usage_names_both_profiles() {
        use clap::CommandFactory;
        let usage = Cli::command().render_usage().to_string();
        assert!(usage.contains("<PROFILE1> <PROFILE2>"));
    }
}
