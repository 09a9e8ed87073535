// Console input helpers shared by the entry and dashboard flows.
//
// All of these block on stdin and re-ask on invalid input, so callers get
// clean values back. Numeric prompts treat an empty line as zero.
use crate::util::parse_f64_safe;
use std::io::{self, Write};

fn read_raw(label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Free-text input; may be empty.
pub fn read_text(label: &str) -> String {
    read_raw(label)
}

pub fn read_u64(label: &str) -> u64 {
    loop {
        let s = read_raw(label);
        if s.is_empty() {
            return 0;
        }
        match s.replace(",", "").parse::<u64>() {
            Ok(n) => return n,
            Err(_) => println!("Please enter a whole number (or leave empty for 0)."),
        }
    }
}

pub fn read_f64(label: &str) -> f64 {
    loop {
        let s = read_raw(label);
        if s.is_empty() {
            return 0.0;
        }
        match parse_f64_safe(Some(&s)) {
            Some(v) if v >= 0.0 => return v,
            _ => println!("Please enter a non-negative amount (or leave empty for 0)."),
        }
    }
}

pub fn confirm(label: &str) -> bool {
    loop {
        let resp = read_raw(&format!("{} (Y/N)", label)).to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Numbered single select. The default option (1-based index) is taken on
/// an empty line.
pub fn select_one(label: &str, options: &[String], default: usize) -> String {
    if options.is_empty() {
        return String::new();
    }
    println!("{}:", label);
    for (i, opt) in options.iter().enumerate() {
        let marker = if i + 1 == default { " (default)" } else { "" };
        println!("  [{}] {}{}", i + 1, opt, marker);
    }
    loop {
        let s = read_raw("Enter choice");
        if s.is_empty() && default >= 1 && default <= options.len() {
            return options[default - 1].clone();
        }
        match s.parse::<usize>() {
            Ok(n) if n >= 1 && n <= options.len() => return options[n - 1].clone(),
            _ => println!("Please enter a number between 1 and {}.", options.len()),
        }
    }
}

/// Numbered multi select: comma-separated indices, empty line selects
/// nothing (callers treat that as "no filter").
pub fn select_many(label: &str, options: &[String]) -> Vec<String> {
    if options.is_empty() {
        return Vec::new();
    }
    println!("{} (comma-separated numbers, empty for all):", label);
    for (i, opt) in options.iter().enumerate() {
        println!("  [{}] {}", i + 1, opt);
    }
    loop {
        let s = read_raw("Enter choices");
        if s.is_empty() {
            return Vec::new();
        }
        let mut picked = Vec::new();
        let mut ok = true;
        for part in s.split(',') {
            match part.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= options.len() => {
                    let value = options[n - 1].clone();
                    if !picked.contains(&value) {
                        picked.push(value);
                    }
                }
                _ => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            return picked;
        }
        println!("Please enter numbers between 1 and {}.", options.len());
    }
}
