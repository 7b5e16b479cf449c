#![forbid(unsafe_code)]

fn main() {
    std::process::exit(mailrank_cli::run());
}
