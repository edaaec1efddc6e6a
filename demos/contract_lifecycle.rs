//! Walks a contract through its full lifecycle, including a failed
//! precondition, structural undo and serialization.

use accord::core::State;
use accord::models::{Actor, Contract, Term};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let owner = Actor::new("John");
    let party = Actor::new("William");

    let mut contract = Contract::new();

    // Signing an empty contract is rejected up front.
    if let Err(err) = contract.sign() {
        println!("cannot sign yet: {err}");
    }

    contract
        .change_ownership(owner)?
        .add_party(party)?
        .add_term(
            Term::new("Scope of work").describe("The supplier delivers the agreed services."),
        )?
        .add_term(Term::new("Payment").describe("Net 30 from the invoice date."))?;

    contract.sign()?.publish()?;
    println!("contract is now '{}'", contract.state().name());

    // Publishing was one snapshot; walking it back lands on 'signed'.
    contract.cancel_last_action();
    println!("after undo: '{}'", contract.state().name());

    println!("{contract}");
    println!("{}", serde_json::to_string_pretty(&contract)?);
    Ok(())
}
