//! `-h` text.

const USAGE: &str = "\
Usage: sift [options] <expression...>

Runs the expression over the lines of the input, bound to @ as a sequence
of strings, and prints the result.

Options:
  -i <file>     Read input lines from <file> instead of stdin
  -f <file>     Prepend the code in <file> to the expression
  -r <seed>     Seed for randomized functions
  -s            Keep map keys in sorted order
  -t <N>        Run the scatter half on N worker threads
  -v            Print the result type (-vv: program, -vvv: parse tree)
  -h [section]  Show help; sections: usage, syntax, functions
";

const SYNTAX: &str = "\
Expressions:
  1  1u  -2  1.5  0xff  'text'  \"text\"   literals
  @                                      the current value (input lines at top level)
  x = e, ...                             assignment, then continue
  e .. f                                 evaluate f with @ = e
  a, b                                   tuple of both values
  f(args)  f.x                           function call
  e[i]  e[i, j]                          index, slice
  [e : src]                              lazy sequence of e for each @ in src
  [. e : src .]                          array of e for each @ in src
  {k -> v : src}                         map; duplicate keys merge (v defaults to 1)
  [try e : src]                          like [e : src], dropping elements where e fails
  [/ cond : src]                         the elements of src where cond is true
  << e : init, src >>                    fold src into init; @ is (accumulator, element)
  def f e                                define f; f(x) evaluates e with @ = x
  def [a, b e]                           define a(x) as x[0] and b(x) as x[1] .. e
  $x  $(x, y)                            call the definition named $ with (@, x, ...)
  :e  ?e                                 flatten, filter
  ** * / % + - & | ^ ~ ! == != < > <= >= && ||
  g --> h                                scatter g over worker threads, gather with h
";

const FUNCTIONS: &str = "\
Functions:
  int uint real string abs        conversions
  cut(s, sep) cut(s, sep, n)      split a string, or take field n
  join(arr, sep)                  join strings
  array sort reverse count        collections
  head(seq, n)                    first n elements
  flatten filter                  sequence combinators (also : and ?)
  if(c, a, b) if(c, a)            a when c is non-zero, else b; without b, fail
  uniques                         number of distinct values
  sum min max avg var stdev       reductions; on a single value inside a map
                                  they accumulate across duplicate keys
";

/// Help text for `section`, if it exists.
pub fn section(name: &str) -> Option<&'static str> {
    match name {
        "usage" => Some(USAGE),
        "syntax" => Some(SYNTAX),
        "functions" => Some(FUNCTIONS),
        _ => None,
    }
}

/// Names accepted by [`section`].
pub const SECTIONS: [&str; 3] = ["usage", "syntax", "functions"];
