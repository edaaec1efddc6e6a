//! Prices a transaction through a net + VAT contract and prints the
//! resulting zero-sum ledger.

use accord::ledger::{cell, Amount, Ledger, Row};
use accord::models::{Actor, Contract, Term, Transaction};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let shop = Actor::new("Shop");
    let customer = Actor::new("Customer");
    let state = Actor::new("State");

    let mut contract = Contract::new();
    let (s, c1) = (shop.clone(), customer.clone());
    let (c2, st) = (customer.clone(), state.clone());
    contract
        .change_ownership(shop.clone())?
        .add_party(customer.clone())?
        .add_term(
            Term::new("Net price")
                .describe("100 from the customer to the shop.")
                .price_with(move |_, _| {
                    Ok(Row::tagged(vec![cell(&c1, -100), cell(&s, 100)], ["net"]).into())
                }),
        )?
        .add_term(
            Term::new("VAT")
                .describe("20% of the net, collected for the state.")
                .price_with(move |ledger: &Ledger, _| {
                    let net = ledger.totals_on_tag("net")[&c2.id()];
                    let vat = net * "0.2".parse::<Amount>().expect("valid rate");
                    Ok(Row::new(vec![cell(&c2, vat), cell(&st, -vat)]).into())
                }),
        )?
        .sign()?
        .publish()?;

    let mut transaction = Transaction::new(contract);
    transaction.order(vec![customer.clone()])?;

    let ledger = transaction.compute_price()?;
    println!("{ledger}");
    println!();
    println!("customer total: {}", ledger.total_for(&customer).fixed());
    println!("shop total:     {}", ledger.total_for(&shop).fixed());
    println!("state total:    {}", ledger.total_for(&state).fixed());
    Ok(())
}
