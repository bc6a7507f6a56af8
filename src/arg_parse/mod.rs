use std::io::Error;

#[derive(Clone, Debug)]
pub struct CmdArgs {
    pub config: String,
    pub once: bool,
    pub dry_run: bool,
}

impl CmdArgs {
    pub fn parse(args: Vec<String>) -> Result<Self, Error> {
        let mut config = String::from("./config.json");
        let mut once = false;
        let mut dry_run = false;
        {
            let mut ap = argparse::ArgumentParser::new();
            ap.set_description("Naver news to Telegram notifier");
            ap.refer(&mut config).add_option(
                &["-c", "--config"],
                argparse::Store,
                "Config file path; default is config.json",
            );
            ap.refer(&mut once).add_option(
                &["-o", "--once"],
                argparse::StoreTrue,
                "Run a single poll cycle and exit",
            );
            ap.refer(&mut dry_run).add_option(
                &["-d", "--dry-run"],
                argparse::StoreTrue,
                "Print notifications to stdout instead of sending them to Telegram",
            );

            match ap.parse(args, &mut std::io::stdout(), &mut std::io::stderr()) {
                Ok(()) => {}
                Err(_) => {
                    return Err(Error::from(std::io::ErrorKind::InvalidInput));
                }
            }
        }

        Ok(CmdArgs {
            config,
            once,
            dry_run,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("naver-news-rust")
            .chain(list.iter().copied())
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let parsed = CmdArgs::parse(args(&[])).unwrap();
        assert_eq!(parsed.config, "./config.json");
        assert!(!parsed.once);
        assert!(!parsed.dry_run);
    }

    #[test]
    fn test_flags() {
        let parsed = CmdArgs::parse(args(&["-c", "/etc/news.json", "--once", "-d"])).unwrap();
        assert_eq!(parsed.config, "/etc/news.json");
        assert!(parsed.once);
        assert!(parsed.dry_run);
    }

    #[test]
    fn test_unknown_flag() {
        assert!(CmdArgs::parse(args(&["--vacuum"])).is_err());
    }
}
