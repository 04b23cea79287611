//! Plain-text rendering of matrices, with numbers aligned on the decimal separator
//! of each column.

use crate::matrix::Matrix;

/// Spaces between two columns, counted before the integer part.
const MARGIN: usize = 2;

/// Renders a matrix as a box of Unicode line-drawing characters.
///
/// Numbers in a column are aligned on their decimal point and padded with
/// trailing zeros to the same number of fraction digits. Values printed
/// without a decimal point (`NaN`, `inf`, exponent forms) are right-aligned
/// in their column. Every line, including the last one, ends with `\n`.
///
/// ```text
/// ┌                ┐
/// │    1.5  -20.00 │
/// │  300.0    0.25 │
/// └                ┘
/// ```
pub fn to_string<M: Matrix + ?Sized>(matrix: &M) -> String {
    let (num_row, num_col) = (matrix.num_row(), matrix.num_col());
    let elements: Vec<String> = matrix.elements().iter().map(|e| format!("{e:?}")).collect();

    let mut column_width = vec![0; num_col];
    let mut fraction_digits = vec![0; num_col];
    // Margin, sign, integer digits and decimal separator.
    let mut remaining_width = vec![0; num_col];
    let mut total_width = 1;
    for i in 0..num_col {
        for j in 0..num_row {
            let element = &elements[j * num_col + i];
            let width = match element.rfind('.') {
                Some(dot) => {
                    let s = dot + 1;
                    remaining_width[i] = remaining_width[i].max(s + MARGIN);
                    fraction_digits[i] = fraction_digits[i].max(element.len() - s);
                    remaining_width[i] + fraction_digits[i]
                }
                None => element.len() + MARGIN,
            };
            column_width[i] = column_width[i].max(width);
        }
        total_width += column_width[i];
    }

    let white_line = " ".repeat(total_width);
    let mut buffer = String::with_capacity((total_width + 3) * (num_row + 2) * 3);
    buffer.push('┌');
    buffer.push_str(&white_line);
    buffer.push_str("┐\n");
    for j in 0..num_row {
        buffer.push('│');
        for i in 0..num_col {
            let element = &elements[j * num_col + i];
            match element.rfind('.') {
                Some(dot) => {
                    let s = dot + 1;
                    // Wider than `remaining_width[i] - s` if a value without decimal
                    // point is the widest of the column.
                    push_repeated(&mut buffer, ' ', column_width[i] - fraction_digits[i] - s);
                    buffer.push_str(element);
                    push_repeated(&mut buffer, '0', fraction_digits[i] - (element.len() - s));
                }
                None => {
                    push_repeated(&mut buffer, ' ', column_width[i] - element.len());
                    buffer.push_str(element);
                }
            }
        }
        buffer.push_str(" │\n");
    }
    buffer.push('└');
    buffer.push_str(&white_line);
    buffer.push_str("┘\n");
    buffer
}

fn push_repeated(buffer: &mut String, c: char, count: usize) {
    buffer.extend(std::iter::repeat(c).take(count));
}
