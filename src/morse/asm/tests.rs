use super::*;
use crate::morse::codec::decode;
use crate::morse::program::load_morse;

#[test]
fn label_and_operands_become_separate_tokens() {
    let line = encode_line("loop: add ax, 1");
    assert_eq!(
        line,
        ".-.. --- --- .--. / ---... / .- -.. -.. / .- -..- / --..-- / .----"
    );
    assert_eq!(decode(&line), "LOOP : ADD AX , 1");
}

#[test]
fn comments_and_blank_lines_are_dropped() {
    assert_eq!(encode_line("; just a comment"), "");
    assert_eq!(encode_line("   "), "");
    assert_eq!(encode_line("HLT ; stop"), ".... .-.. -");
}

#[test]
fn tabs_separate_words() {
    assert_eq!(decode(&encode_line("MOV\tAX,\t5")), "MOV AX , 5");
}

#[test]
fn negative_literals_survive() {
    assert_eq!(decode(&encode_line("MOV AX, -1")), "MOV AX , -1");
}

#[test]
fn assemble_skips_empty_lines() {
    let src = "; header\nstart:\n\n  MOV AX, 65 ; load\n  OUT AX\nHLT\n";
    let lines = assemble(src, false).expect("assemble");
    assert_eq!(lines.len(), 4);
    assert_eq!(decode(&lines[0]), "START :");
    assert_eq!(decode(&lines[1]), "MOV AX , 65");
}

#[test]
fn unsupported_characters_depend_on_mode() {
    let lines = assemble("MOV AX, #5", false).expect("assemble");
    assert_eq!(decode(&lines[0]), "MOV AX , 5");

    let err = assemble("HLT\nMOV AX, #5", true).err().expect("expected error");
    assert_eq!(err.line, 1);
    assert_eq!(err.to_string(), "line 2: character '#' has no Morse encoding");
}

#[test]
fn assembled_program_loads() {
    let src = "MOV CX, 2\nagain: DEC CX\nJNZ again\nHLT";
    let morse = assemble(src, true).expect("assemble").join("\n");
    let prog = load_morse(&morse, true).expect("load");
    assert_eq!(prog.len(), 4);
    assert_eq!(prog.label("AGAIN"), Some(1));
}

#[test]
fn assemble_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("morseasm-asm-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let input = dir.join("prog.asm");
    let output = dir.join("prog.morse");
    fs::write(&input, "MOV AX, 65\nOUT AX ; print\nHLT\n").unwrap();

    let n = assemble_file(&input, &output, false).expect("assemble_file");
    assert_eq!(n, 3);
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 3);
    assert!(!written.ends_with('\n'));
    assert_eq!(decode(written.lines().nth(1).unwrap()), "OUT AX");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_input_is_an_io_error() {
    let err = assemble_file(Path::new("/nonexistent/prog.asm"), Path::new("/tmp/x.morse"), false)
        .unwrap_err();
    assert!(matches!(err, MorseError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}
