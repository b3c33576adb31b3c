pub mod hex_maze;
