mod cli;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use quark::{Options, RamDisk, Session};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let options = Options {
        packing: cli.packing.into(),
    };
    let session = match Session::boot_with(Arc::new(RamDisk::new()), &cli.image, options) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("boot {}: {}", cli.image.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = repl(&session) {
        eprintln!("shell: {}", e);
    }

    if let Err(e) = session.sync() {
        eprintln!("sync: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn repl(session: &Session) -> io::Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("shell> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let mut args = line.split_whitespace();
        let Some(cmd) = args.next() else {
            continue;
        };
        let arg = args.next();

        match (cmd, arg) {
            ("exit" | "exit;", _) => return Ok(()),
            ("create", Some(path)) => {
                if let Err(e) = session.create_entry(path) {
                    eprintln!("create: {}", e);
                }
            }
            ("mkdir", Some(path)) => {
                if let Err(e) = session.create_dir(path) {
                    eprintln!("mkdir: {}", e);
                }
            }
            ("open", Some(path)) => match session.open_entry(path) {
                Ok(fd) => println!("fd: {}", fd),
                Err(e) => eprintln!("open: {}", e),
            },
            ("close", Some(fd)) => match fd.parse::<usize>() {
                Ok(fd) => {
                    if let Err(e) = session.close(fd) {
                        eprintln!("close: {}", e);
                    }
                }
                Err(_) => eprintln!("close: {:?} is not a handle", fd),
            },
            ("ls", path) => match session.fs().read_dir(path.unwrap_or("/")) {
                Ok(entries) => {
                    for entry in entries {
                        println!("{:>4} {}", entry.inode_id, entry.name());
                    }
                }
                Err(e) => eprintln!("ls: {}", e),
            },
            ("sync", _) => {
                if let Err(e) = session.sync() {
                    eprintln!("sync: {}", e);
                }
            }
            ("create" | "mkdir" | "open" | "close", None) => eprintln!("{}: missing argument", cmd),
            _ => println!("shell: command not found"),
        }
    }
}
