#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command, PresetArg, ServeArgs};
    use clap::{CommandFactory, Parser};
    use devloop_config::Preset;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_means_default_serve() {
        let cli = Cli::try_parse_from(["devloop"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "devloop",
            "serve",
            "--port",
            "4000",
            "--host",
            "0.0.0.0",
            "--dir",
            "site",
            "--preset",
            "split",
            "--no-open",
            "--log-requests",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(4000));
                assert_eq!(args.host.unwrap().to_string(), "0.0.0.0");
                assert_eq!(args.dir, Some(PathBuf::from("site")));
                assert_eq!(args.preset, Some(PresetArg::Split));
                assert!(args.no_open);
                assert!(args.log_requests);
                assert!(!args.no_tasks);
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        assert!(Cli::try_parse_from(["devloop", "serve", "--host", "not-an-ip"]).is_err());
    }

    #[test]
    fn test_port_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["devloop", "serve", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_cli_verbose_quiet_conflict() {
        assert!(Cli::try_parse_from(["devloop", "--verbose", "--quiet"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["devloop", "check", "--no-color", "-v"]).unwrap();
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Command::Check(_))));
    }

    #[test]
    fn test_check_args_convert_to_serve_args() {
        let cli =
            Cli::try_parse_from(["devloop", "check", "--dir", "site", "--preset", "single"])
                .unwrap();
        let Some(Command::Check(check)) = cli.command else {
            panic!("expected check");
        };
        let serve: ServeArgs = check.into();
        assert_eq!(serve.dir, Some(PathBuf::from("site")));
        assert_eq!(serve.preset, Some(PresetArg::Single));
        assert_eq!(serve.port, None);
        assert!(!serve.no_open);
    }

    #[test]
    fn test_preset_arg_maps_to_config_preset() {
        assert_eq!(Preset::from(PresetArg::Single), Preset::Single);
        assert_eq!(Preset::from(PresetArg::Split), Preset::Split);
    }
}
