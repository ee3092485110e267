#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_preview_defaults() {
        let cli = Cli::parse_from(["loupe", "preview"]);
        let Command::Preview(args) = cli.command else {
            panic!("expected preview command");
        };
        assert_eq!(args.dir, None);
        assert!(!args.debug);
        assert_eq!(args.router, None);
        assert_eq!(args.autoprefix, None);
        assert_eq!(args.port, None);
    }

    #[test]
    fn test_preview_all_options() {
        let cli = Cli::parse_from([
            "loupe",
            "preview",
            "components/button",
            "--debug",
            "--autoprefix",
            "false",
            "--router",
            "true",
            "--title",
            "Button",
            "--port",
            "5000",
            "--live-reload-port",
            "5001",
            "--root",
            "/work",
            "--open",
        ]);
        let Command::Preview(args) = cli.command else {
            panic!("expected preview command");
        };
        assert_eq!(args.dir, Some(PathBuf::from("components/button")));
        assert!(args.debug);
        assert_eq!(args.autoprefix, Some(false));
        assert_eq!(args.router, Some(true));
        assert_eq!(args.title.as_deref(), Some("Button"));
        assert_eq!(args.port, Some(5000));
        assert_eq!(args.live_reload_port, Some(5001));
        assert_eq!(args.root, Some(PathBuf::from("/work")));
        assert!(args.open);
    }

    #[test]
    fn test_router_requires_boolean() {
        assert!(Cli::try_parse_from(["loupe", "preview", "--router", "maybe"]).is_err());
        let cli = Cli::parse_from(["loupe", "preview", "--router", "false"]);
        let Command::Preview(args) = cli.command else {
            panic!("expected preview command");
        };
        assert_eq!(args.router, Some(false));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["loupe", "--verbose", "--no-color", "check", "dir"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["loupe", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_check_args_convert_to_preview_args() {
        let cli = Cli::parse_from(["loupe", "check", "card", "--root", "/work"]);
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        let preview = crate::cli::PreviewArgs::from(&args);
        assert_eq!(preview.dir, Some(PathBuf::from("card")));
        assert_eq!(preview.root, Some(PathBuf::from("/work")));
        assert!(!preview.debug);
    }
}
