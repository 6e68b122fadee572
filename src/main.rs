use webchess::{GameConfig, Session, terminal};

fn main() {
    log::info!("webchess terminal");
    terminal::run_interactive_terminal(Session::new(GameConfig::default()));
}
