use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use log::debug;

use crate::currencies::convert_currency;
use crate::models::{Currency, RateTable};

/// Interactive conversion loop over a loaded rate table.
///
/// The session borrows the table and owns its console streams. It is
/// generic over the streams so tests can drive it with in-memory buffers.
pub struct Session<'a, R, W> {
    table: &'a RateTable,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(table: &'a RateTable, input: R, output: W) -> Session<'a, R, W> {
        Session {
            table,
            input,
            output,
        }
    }

    /// Run the session: list the available currencies once, then convert
    /// until the user declines another round.
    ///
    /// Invalid codes, amounts, and continue answers re-prompt locally and
    /// never escape. Only console I/O failure (including end of input) is
    /// an error.
    pub fn run(&mut self) -> Result<()> {
        self.display_available_currencies()?;

        loop {
            let (from_code, from) = self.prompt_currency_code("Enter source currency code: ")?;
            let (to_code, to) = self.prompt_currency_code("Enter target currency code: ")?;
            let amount = self.prompt_amount()?;

            let converted = convert_currency(amount, &from, &to);
            writeln!(
                self.output,
                "{} {} ({}, {}) is equal to {:.2} {} ({}, {}).",
                amount, from_code, from.name, from.symbol, converted, to_code, to.name, to.symbol
            )?;

            if !self.prompt_continue()? {
                break;
            }
        }

        writeln!(
            self.output,
            "Thank you for using the Currency Converter. Goodbye!"
        )?;
        Ok(())
    }

    fn display_available_currencies(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Currency Converter!")?;
        writeln!(self.output)?;
        writeln!(self.output, "Available currencies:")?;
        for (code, currency) in self.table.iter() {
            writeln!(self.output, "{}: {} ({})", code, currency.name, currency.symbol)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Prompt until a code present in the table is entered. Returns the
    /// canonical uppercase code and a copy of its entry.
    fn prompt_currency_code(&mut self, prompt: &str) -> Result<(String, Currency)> {
        loop {
            let code = self.prompt_line(prompt)?.trim().to_uppercase();
            match self.table.get(&code) {
                Some(currency) => return Ok((code, currency.clone())),
                None => {
                    debug!("Unknown currency code entered: {}", code);
                    writeln!(self.output, "Invalid currency code. Please try again.")?;
                }
            }
        }
    }

    /// Prompt until the input parses as a number. Negative and zero
    /// amounts pass through unchanged.
    fn prompt_amount(&mut self) -> Result<f64> {
        loop {
            let input = self.prompt_line("Enter amount to convert: ")?;
            match input.trim().parse::<f64>() {
                Ok(amount) => return Ok(amount),
                Err(_) => {
                    debug!("Non-numeric amount entered: {}", input.trim());
                    writeln!(self.output, "Invalid amount. Please enter a numeric value.")?;
                }
            }
        }
    }

    /// Prompt until a case-insensitive y or n is entered.
    fn prompt_continue(&mut self) -> Result<bool> {
        loop {
            let input = self.prompt_line("Do you want to perform another conversion? (y/n): ")?;
            match input.trim().to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => {
                    writeln!(self.output, "Invalid option. Please enter 'y' or 'n'.")?;
                }
            }
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let bytes_read = self.input.read_line(&mut line)?;
        if bytes_read == 0 {
            // A closed input stream would otherwise spin the re-prompt loops
            bail!("input ended before the session finished");
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrencyFile;
    use std::io::Cursor;

    fn test_table() -> RateTable {
        let file: CurrencyFile = serde_json::from_str(
            r#"{
                "rates": {
                    "USD": { "rate": 1.0, "symbol": "$", "name": "US Dollar" },
                    "EUR": { "rate": 0.9, "symbol": "€", "name": "Euro" },
                    "JPY": { "rate": 147.0, "symbol": "¥", "name": "Japanese Yen" }
                }
            }"#,
        )
        .unwrap();
        RateTable::from_file(file).unwrap()
    }

    fn run_session(input: &str) -> String {
        let table = test_table();
        let mut output = Vec::new();
        {
            let mut session = Session::new(&table, Cursor::new(input.as_bytes()), &mut output);
            session.run().unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_single_conversion() {
        let output = run_session("USD\nEUR\n100\nn\n");

        assert!(output
            .contains("100 USD (US Dollar, $) is equal to 90.00 EUR (Euro, €)."));
        assert!(output.contains("Thank you for using the Currency Converter. Goodbye!"));
    }

    #[test]
    fn test_reverse_conversion_rounds_display_to_two_decimals() {
        let output = run_session("EUR\nUSD\n100\nn\n");

        assert!(output
            .contains("100 EUR (Euro, €) is equal to 111.11 USD (US Dollar, $)."));
    }

    #[test]
    fn test_lists_currencies_once_in_file_order() {
        let output = run_session("USD\nEUR\n100\ny\nEUR\nJPY\n5\nn\n");

        let usd_pos = output.find("USD: US Dollar ($)").unwrap();
        let eur_pos = output.find("EUR: Euro (€)").unwrap();
        let jpy_pos = output.find("JPY: Japanese Yen (¥)").unwrap();
        assert!(usd_pos < eur_pos && eur_pos < jpy_pos);

        // The listing runs at session start only, not per iteration
        assert_eq!(output.matches("Available currencies:").count(), 1);
        assert_eq!(output.matches("USD: US Dollar ($)").count(), 1);
    }

    #[test]
    fn test_unknown_code_reprompts() {
        let output = run_session("XXX\nUSD\nEUR\n100\nn\n");

        assert_eq!(
            output.matches("Invalid currency code. Please try again.").count(),
            1
        );
        assert!(output.contains("is equal to 90.00 EUR"));
    }

    #[test]
    fn test_codes_are_case_insensitive() {
        let output = run_session("usd\neur\n50\nn\n");

        assert!(output
            .contains("50 USD (US Dollar, $) is equal to 45.00 EUR (Euro, €)."));
    }

    #[test]
    fn test_non_numeric_amount_reprompts_until_valid() {
        let output = run_session("USD\nEUR\nabc\ntwenty\n25\nn\n");

        assert_eq!(
            output
                .matches("Invalid amount. Please enter a numeric value.")
                .count(),
            2
        );
        assert!(output.contains("25 USD (US Dollar, $) is equal to 22.50 EUR (Euro, €)."));
    }

    #[test]
    fn test_negative_amount_is_accepted() {
        let output = run_session("USD\nEUR\n-10\nn\n");

        assert!(output.contains("-10 USD (US Dollar, $) is equal to -9.00 EUR (Euro, €)."));
    }

    #[test]
    fn test_unrecognized_continue_answer_reprompts() {
        let output = run_session("USD\nEUR\n100\nmaybe\ny\nEUR\nUSD\n100\nn\n");

        assert_eq!(
            output.matches("Invalid option. Please enter 'y' or 'n'.").count(),
            1
        );
        assert_eq!(output.matches("is equal to").count(), 2);
    }

    #[test]
    fn test_continue_answers_are_case_insensitive() {
        let output = run_session("USD\nEUR\n1\nY\nUSD\nJPY\n1\nN\n");

        assert_eq!(output.matches("is equal to").count(), 2);
        assert!(output.contains("Thank you for using the Currency Converter. Goodbye!"));
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let table = test_table();
        let mut output = Vec::new();
        let mut session = Session::new(&table, Cursor::new(&b""[..]), &mut output);

        let err = session.run().unwrap_err();
        assert!(err.to_string().contains("input ended"));
    }

    #[test]
    fn test_prompts_appear_in_order() {
        let output = run_session("USD\nEUR\n100\nn\n");

        let from_pos = output.find("Enter source currency code: ").unwrap();
        let to_pos = output.find("Enter target currency code: ").unwrap();
        let amount_pos = output.find("Enter amount to convert: ").unwrap();
        let continue_pos = output
            .find("Do you want to perform another conversion? (y/n): ")
            .unwrap();
        assert!(from_pos < to_pos && to_pos < amount_pos && amount_pos < continue_pos);
    }
}
