fn main() {
    if let Err(err) = secassess::cli::run() {
        secassess::ui::eprintln_error(&err);
        std::process::exit(secassess::exit::exit_code(&err));
    }
}
