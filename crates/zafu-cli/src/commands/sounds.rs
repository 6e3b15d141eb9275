use zafu_core::{AlertSound, Config};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let selected = config.alert_sound().id;

    for sound in AlertSound::all() {
        let marker = if sound.id == selected { "*" } else { " " };
        println!("{marker} {:<18} {}", sound.id, sound.name);
    }
    Ok(())
}
