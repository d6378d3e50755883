// Minimal interactive position shell. Type "help" for commands.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use wrenchess::{Board, Color, File, Rank, Square, Zobrist};

fn print_board(board: &Board) {
    for rank in Rank::iter() {
        print!("{} |", rank);
        for file in File::iter() {
            print!(" {}", board.get(Square::from_parts(file, rank)));
        }
        println!();
    }
    println!("  +----------------");
    println!("    a b c d e f g h");
    println!("fen: {}", board.as_fen());
    println!("hash: {:#018x}", board.zobrist_hash());
    if board.is_check() {
        println!("check from: {:?}", board.checkers());
    }
}

fn material(board: &Board) -> (usize, usize) {
    let mut white = 0;
    let mut black = 0;
    for sq in Square::iter() {
        match board.get(sq).color() {
            Some(Color::White) => white += 1,
            Some(Color::Black) => black += 1,
            None => {}
        }
    }
    (white, black)
}

fn main() {
    let keys = Arc::new(Zobrist::new());
    println!("wrenchess demo shell (zobrist seed {:#x})", keys.seed());
    let mut board = Board::initial(keys.clone());
    print_board(&board);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().unwrap();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap() == 0 {
            break;
        }
        let mut words = line.split_whitespace();
        let cmd = match words.next() {
            Some(cmd) => cmd,
            None => continue,
        };
        let rest = words.collect::<Vec<_>>().join(" ");
        match cmd {
            "help" => {
                println!("commands:");
                println!("  startpos          reset to the starting position");
                println!("  fen <fen>         load a position");
                println!("  move <uci>...     apply moves (e.g. `move e2e4 e7e5`)");
                println!("  moves [square]    list legal moves");
                println!("  undo              revert the last move");
                println!("  perft <depth>     count move paths");
                println!("  divide <depth>    perft split by first move");
                println!("  show              print the board");
                println!("  quit");
            }
            "startpos" => {
                board = Board::initial(keys.clone());
                print_board(&board);
            }
            "fen" => match Board::from_fen(&rest, keys.clone()) {
                Ok(b) => {
                    board = b;
                    print_board(&board);
                }
                Err(e) => println!("error: {}", e),
            },
            "move" => match board.make_uci_list(&rest) {
                Ok(()) => print_board(&board),
                Err(e) => println!("error: {}", e),
            },
            "moves" => {
                let list = match rest.parse::<Square>() {
                    Ok(sq) => board.legal_moves_from(sq),
                    Err(_) => board.legal_moves(),
                };
                let strs: Vec<_> = list.iter().map(|mv| mv.to_string()).collect();
                println!("{} moves: {}", strs.len(), strs.join(" "));
            }
            "undo" => {
                if board.history_len() == 0 {
                    println!("error: nothing to undo");
                } else {
                    let mv = board.unmake();
                    println!("reverted {}", mv);
                    print_board(&board);
                }
            }
            "perft" => match rest.parse::<usize>() {
                Ok(depth) => println!("perft({}) = {}", depth, board.perft_memoized(depth)),
                Err(_) => println!("error: bad depth"),
            },
            "divide" => match rest.parse::<usize>() {
                Ok(depth) => {
                    let divided = board.perft_divided(depth);
                    let mut total = 0;
                    for (mv, count) in &divided {
                        println!("{}: {}", mv, count);
                        total += count;
                    }
                    println!("total: {}", total);
                }
                Err(_) => println!("error: bad depth"),
            },
            "show" => {
                print_board(&board);
                let (white, black) = material(&board);
                println!("pieces: {} white, {} black", white, black);
            }
            "quit" | "exit" => break,
            _ => println!("unknown command {:?}, try `help`", cmd),
        }
    }
}
