use bracket_terminal::prelude::VirtualKeyCode;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

// Replays a keypress script instead of live input; handy for demo runs
// and for driving the game headlessly.
pub struct ScriptedInput {
    commands: Vec<VirtualKeyCode>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut commands = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for ch in trimmed.chars() {
                if let Some(key) = char_to_key(ch) {
                    commands.push(key);
                } else {
                    eprintln!("gloomcrawl: unknown key in script: {ch}");
                }
            }
        }

        Ok(Self {
            commands,
            cursor: 0,
        })
    }

    pub fn next_key(&mut self) -> Option<VirtualKeyCode> {
        let key = self.commands.get(self.cursor).copied();
        if key.is_some() {
            self.cursor += 1;
        }
        key
    }
}

fn char_to_key(ch: char) -> Option<VirtualKeyCode> {
    match ch {
        'w' | 'W' => Some(VirtualKeyCode::W),
        'a' | 'A' => Some(VirtualKeyCode::A),
        's' | 'S' => Some(VirtualKeyCode::S),
        'd' | 'D' => Some(VirtualKeyCode::D),
        ' ' | 'x' | 'X' => Some(VirtualKeyCode::Space), // attack
        'p' | 'P' => Some(VirtualKeyCode::P),           // state dump
        'r' | 'R' => Some(VirtualKeyCode::R),           // restart
        'q' | 'Q' => Some(VirtualKeyCode::Q),
        '.' => Some(VirtualKeyCode::Period), // wait
        _ => None,
    }
}
