//! Mocked data operations: load, view, and search over hard-coded in-memory
//! datasets. No real file or network access happens here; `load_file` only
//! flips the session's loaded-dataset name.

use crate::session::CommandResult;

type Rows = &'static [&'static [&'static str]];

/// First row of each dataset is the header.
const CENSUS: Rows = &[
    &["Name", "Age", "City"],
    &["Alice", "34", "Providence"],
    &["Bob", "41", "Cranston"],
    &["Carol", "29", "Providence"],
    &["Dave", "57", "Warwick"],
];

const STARDATA: Rows = &[
    &["StarID", "ProperName", "X", "Y", "Z"],
    &["0", "Sol", "0", "0", "0"],
    &["1", "Andreas", "282.43485", "0.00449", "5.36884"],
    &["2", "Rory", "43.04329", "0.00285", "-15.24144"],
    &["3", "Mortimer", "277.11358", "0.02422", "223.27753"],
];

fn dataset(name: &str) -> Option<Rows> {
    match name {
        "census" => Some(CENSUS),
        "stardata" => Some(STARDATA),
        _ => None,
    }
}

fn to_table(rows: impl IntoIterator<Item = &'static [&'static str]>) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

const NOTHING_LOADED: &str = "No dataset is loaded. Use load_file first";

/// Handle `load_file <dataset>`. `tokens[0]` is the command word itself.
/// The setter is only called on success.
pub fn load(tokens: &[&str], set_loaded: impl FnOnce(&str)) -> CommandResult {
    let name = match tokens {
        [_, name] => *name,
        [_] => return CommandResult::message("Missing dataset name for load_file"),
        _ => {
            return CommandResult::message(
                "Too many arguments for load_file: expected a single dataset name",
            )
        }
    };

    if dataset(name).is_none() {
        return CommandResult::message(format!("Could not load dataset: {name}"));
    }

    set_loaded(name);
    CommandResult::message(format!("Successfully loaded dataset: {name}"))
}

/// Handle `view`: the full contents of the loaded dataset.
pub fn view(loaded: Option<&str>) -> CommandResult {
    match loaded.and_then(dataset) {
        Some(rows) => CommandResult::Table(to_table(rows.iter().copied())),
        None => CommandResult::message(NOTHING_LOADED),
    }
}

/// Handle `search <value>` or `search <column> <value>` against the loaded
/// dataset. Gets the full trimmed command text so the query keeps its shape.
pub fn search(command: &str, loaded: Option<&str>) -> CommandResult {
    let rows = match loaded.and_then(dataset) {
        Some(rows) => rows,
        None => return CommandResult::message(NOTHING_LOADED),
    };

    let terms: Vec<&str> = command.split_whitespace().skip(1).collect();
    let (header, data) = match rows.split_first() {
        Some(split) => split,
        None => return CommandResult::message("Dataset is empty"),
    };

    let (column, value) = match terms.as_slice() {
        [] => return CommandResult::message("Missing search query"),
        [value] => (None, *value),
        [column, value] => match column_index(header, column) {
            Some(idx) => (Some(idx), *value),
            None => return CommandResult::message(format!("No such column: {column}")),
        },
        _ => {
            return CommandResult::message(
                "Too many search terms: expected a value or a column and a value",
            )
        }
    };

    let needle = value.to_lowercase();
    let matches: Vec<&&[&str]> = data
        .iter()
        .filter(|row| match column {
            Some(idx) => row
                .get(idx)
                .map_or(false, |cell| cell.to_lowercase().contains(&needle)),
            None => row.iter().any(|cell| cell.to_lowercase().contains(&needle)),
        })
        .collect();

    if matches.is_empty() {
        let query = terms.join(" ");
        return CommandResult::message(format!("No matching rows found for: {query}"));
    }

    let mut table = vec![header.iter().map(|cell| cell.to_string()).collect()];
    table.extend(matches.into_iter().map(|row| {
        row.iter().map(|cell| cell.to_string()).collect()
    }));
    CommandResult::Table(table)
}

/// Resolve a column given either a header name (case-insensitive) or a
/// 0-based index.
fn column_index(header: &[&str], column: &str) -> Option<usize> {
    if let Some(idx) = header
        .iter()
        .position(|name| name.eq_ignore_ascii_case(column))
    {
        return Some(idx);
    }

    column.parse::<usize>().ok().filter(|idx| *idx < header.len())
}

#[cfg(test)]
mod test {
    use super::*;

    fn msg(result: &CommandResult) -> &str {
        match result {
            CommandResult::Message(s) => s,
            other => panic!("expected message, got {other:?}"),
        }
    }

    fn table(result: &CommandResult) -> &Vec<Vec<String>> {
        match result {
            CommandResult::Table(rows) => rows,
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn load_known_dataset_calls_setter() {
        let mut loaded = None;
        let result = load(&["load_file", "census"], |name| loaded = Some(name.to_string()));
        assert_eq!(loaded.as_deref(), Some("census"));
        assert_eq!(msg(&result), "Successfully loaded dataset: census");
    }

    #[test]
    fn load_unknown_dataset_leaves_setter_untouched() {
        let mut loaded = None;
        let result = load(&["load_file", "nope"], |name| loaded = Some(name.to_string()));
        assert_eq!(loaded, None);
        assert_eq!(msg(&result), "Could not load dataset: nope");
    }

    #[test]
    fn load_without_argument_is_an_error_message() {
        let result = load(&["load_file"], |_| panic!("setter must not run"));
        assert_eq!(msg(&result), "Missing dataset name for load_file");
    }

    #[test]
    fn load_with_extra_arguments_is_an_error_message() {
        let result = load(&["load_file", "census", "extra"], |_| {
            panic!("setter must not run")
        });
        assert!(msg(&result).starts_with("Too many arguments"));
    }

    #[test]
    fn view_without_loaded_dataset() {
        assert_eq!(msg(&view(None)), NOTHING_LOADED);
    }

    #[test]
    fn view_returns_all_rows_with_header() {
        let result = view(Some("census"));
        let rows = table(&result);
        assert_eq!(rows.len(), CENSUS.len());
        assert_eq!(rows[0], ["Name", "Age", "City"]);
        assert_eq!(rows[1][0], "Alice");
    }

    #[test]
    fn search_without_loaded_dataset() {
        assert_eq!(msg(&search("search Alice", None)), NOTHING_LOADED);
    }

    #[test]
    fn search_any_column_is_case_insensitive() {
        let result = search("search providence", Some("census"));
        let rows = table(&result);
        assert_eq!(rows[0], ["Name", "Age", "City"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "Alice");
        assert_eq!(rows[2][0], "Carol");
    }

    #[test]
    fn search_by_column_name() {
        let result = search("search name bob", Some("census"));
        let rows = table(&result);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ["Bob", "41", "Cranston"]);
    }

    #[test]
    fn search_by_column_index() {
        let result = search("search 2 Warwick", Some("census"));
        let rows = table(&result);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Dave");
    }

    #[test]
    fn search_unknown_column() {
        let result = search("search Salary 10", Some("census"));
        assert_eq!(msg(&result), "No such column: Salary");
    }

    #[test]
    fn search_with_no_match() {
        let result = search("search Zanzibar", Some("census"));
        assert_eq!(msg(&result), "No matching rows found for: Zanzibar");
    }

    #[test]
    fn search_with_no_query() {
        let result = search("search", Some("census"));
        assert_eq!(msg(&result), "Missing search query");
    }
}
