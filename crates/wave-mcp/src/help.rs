//! Static WAL reference text served by `get_wal_help`

/// Help topics in the order they are advertised.
pub const TOPICS: [&str; 5] = ["overview", "functions", "examples", "debugging", "syntax"];

const RULE_WIDTH: usize = 50;

const OVERVIEW: &str = "
WAL (Waveform Analysis Language) - Quick Reference

WAL is a small Lisp for querying recorded waveforms. Every call is written
as (function arg1 arg2 ...).

Key concepts:
- Signals: a bare name such as clk or tb.dut.counter is that signal's value
  at the current time step
- Time: the current step is INDEX; (step N) moves it, TS is its raw timestamp
- Lists: searches such as (find cond) return lists of time steps
- Conditions: any value other than 0, #f, nil, \"\" or an empty list is true
";

const FUNCTIONS: &str = "
Core WAL functions for waveform analysis:

TIME & NAVIGATION:
- (step N) - Move N steps forward (negative moves back); (step) moves one
- INDEX - Current time step
- TS - Raw timestamp of the current step
- MAX-INDEX - Last time step of the recording
- (reval expr N) - Evaluate expr N steps away from the current one
- (prev expr) - Evaluate expr one step earlier

SIGNAL ACCESS:
- SIGNALS - List of all signal names
- signal_name - Value of a signal at the current step
- (length list) - Number of elements in a list

SEARCH & FILTER:
- (find cond) - Time steps where cond is true
- (count cond) - Number of time steps where cond is true
- (= a b ...) (!= a b) (< a b) (> a b) (<= a b) (>= a b) - Comparisons

LOGIC:
- (&& a b ...) or (and a b ...) - Logical AND, short-circuiting
- (|| a b ...) or (or a b ...) - Logical OR, short-circuiting
- (! a) or (not a) - Negation

ARITHMETIC:
- (+ a b ...) (- a b ...) (* a b ...) (/ a b ...) (** base exp)
- (abs n) (min ...) (max ...) (sum list)

LISTS:
- (list a b ...) (first list) (last list) (nth n list)
";

const EXAMPLES: &str = "
WAL usage examples:

BASIC SIGNAL ACCESS:
- SIGNALS - List all signals
- clk - Clock value at the current step
- (step 10) clk - Clock value ten steps later

TIME & COUNTING:
- (length (find true)) - Total number of time steps
- (count (= clk 1)) - Clock-high steps
- (count (= reset 0)) - Steps with reset released

SIGNAL SEARCHES:
- (find (= clk 1)) - Steps where the clock is high
- (find (&& (= clk 0) (= data 1))) - Clock low AND data high
- (find (|| (= sig1 1) (= sig2 1))) - Either signal high

COMPLEX CONDITIONS:
- (find (> counter 10)) - Counter above 10
- (find (&& (= clk 1) (> counter 5))) - Clock high with counter above 5
- (length (find (= state 3))) - Steps spent in state 3

EDGES:
- (find (&& (> INDEX 0) (= clk 1) (= (prev clk) 0))) - Rising clock edges
- (find (&& (> INDEX 0) (!= data (prev data)))) - Steps where data changed
";

const DEBUGGING: &str = "
Common WAL debugging patterns:

PROTOCOL ANALYSIS:
- Stalls: (find (&& (= valid 1) (= ready 0)))
- Idle bus: (find (&& (= valid 0) (= ready 1)))
- State machines: (find (= state 4)) - Steps spent in one state

TIMING ANALYSIS:
- Clock activity: (count (= clk 1))
- Duty cycle: (/ (count (= clk 1)) (length (find true)))
- First event: (first (find (= done 1)))

SIGNAL VALIDATION:
- Range check: (find (> data 255))
- Constant check: (count (!= mode 2))
- Unknown values: signals holding x or z evaluate to strings such as \"x\",
  so (find (= data \"x\")) finds them

COUNTER ANALYSIS:
- Wrap-around: (find (&& (> INDEX 0) (= counter 0) (= (prev counter) 15)))
- Skipped counts: (find (&& (> INDEX 0) (!= counter (prev counter))
  (!= counter (+ (prev counter) 1))))
- Reset failures: (find (&& (= reset 1) (!= counter 0)))

WHEN AN EXPRESSION FAILS:
- \"undefined symbol\": check the exact name with SIGNALS
- \"argument must be a list\": wrap the condition in (find ...)
- \"out of range\": (prev ...) at step 0 or (step N) past the end; guard with
  (> INDEX 0)
";

const SYNTAX: &str = "
WAL syntax reference:

BASIC SYNTAX:
- Calls use parentheses: (function arg1 arg2)
- Comments run from ; to the end of the line
- Numbers: 123, -4, 2.5, 0xFF (hex), 0b1010 (binary)
- Strings: \"text\"
- Booleans: #t and #f
- Quoting: 'name or (quote (a b)) yields data instead of evaluating it

OPERATORS:
- Arithmetic: + - * / ** (power)
- Comparison: = != < > <= >=
- Logic: && || ! (also and, or, not)

VARIABLES:
- SIGNALS, INDEX, TS, MAX-INDEX - Built in
- signal_name - Direct signal access
- (define name value) - Bind a variable
- (set name value) - Update an existing binding

CONTROL FLOW:
- (if cond then else) - Conditional; else is optional
- (let ((var value) ...) body ...) - Local bindings
- (do expr ...) - Evaluate in order, keep the last result

MULTIPLE FORMS:
- An expression may hold several forms; they run in order and the result
  of the last one is reported, e.g. (step 5) INDEX
";

fn topic_text(topic: &str) -> Option<&'static str> {
    match topic {
        "overview" => Some(OVERVIEW),
        "functions" => Some(FUNCTIONS),
        "examples" => Some(EXAMPLES),
        "debugging" => Some(DEBUGGING),
        "syntax" => Some(SYNTAX),
        _ => None,
    }
}

fn title_case(topic: &str) -> String {
    let mut chars = topic.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render the help page for `topic`. Unknown or absent topics render the
/// overview page.
pub fn render(topic: Option<&str>) -> String {
    let (topic, text) = topic
        .and_then(|t| topic_text(t).map(|text| (t, text)))
        .unwrap_or(("overview", OVERVIEW));
    [
        format!("WAL Help - {}", title_case(topic)),
        "=".repeat(RULE_WIDTH),
        text.trim().to_string(),
        String::new(),
        format!("Available topics: {}", TOPICS.join(", ")),
        "Use get_wal_help with a different topic for more information.".to_string(),
    ]
    .join("\n")
}
