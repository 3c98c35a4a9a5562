use sqlx::FromRow;

/// Units sold for one genre.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct GenreSales {
    pub name: String,
    pub units: i64,
}

/// Average order amount, rounded to the nearest integer; 0 with no orders.
pub fn average_amount(order_amounts: &[i64]) -> i64 {
    if order_amounts.is_empty() {
        return 0;
    }
    let total: i64 = order_amounts.iter().sum();
    (total as f64 / order_amounts.len() as f64).round() as i64
}

/// Best and worst selling genre. Ties are broken by the first-encountered
/// genre in traversal order.
pub fn sales_extremes(sales: &[GenreSales]) -> Option<(&GenreSales, &GenreSales)> {
    let first = sales.first()?;
    let mut most = first;
    let mut fewest = first;
    for genre in &sales[1..] {
        if genre.units > most.units {
            most = genre;
        }
        if genre.units < fewest.units {
            fewest = genre;
        }
    }
    Some((most, fewest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales(rows: &[(&str, i64)]) -> Vec<GenreSales> {
        rows.iter()
            .map(|(name, units)| GenreSales {
                name: name.to_string(),
                units: *units,
            })
            .collect()
    }

    #[test]
    fn average_is_zero_without_orders() {
        assert_eq!(average_amount(&[]), 0);
    }

    #[test]
    fn average_of_two_orders() {
        // one order of 2 x $10, one order of 1 x $20
        assert_eq!(average_amount(&[20, 20]), 20);
    }

    #[test]
    fn average_rounds_to_nearest() {
        assert_eq!(average_amount(&[10, 11]), 11); // 10.5 rounds up
        assert_eq!(average_amount(&[10, 10, 11]), 10); // 10.33 rounds down
    }

    #[test]
    fn extremes_empty_input() {
        assert!(sales_extremes(&[]).is_none());
    }

    #[test]
    fn extremes_single_genre_is_both() {
        let s = sales(&[("Programming", 7)]);
        let (most, fewest) = sales_extremes(&s).unwrap();
        assert_eq!(most.name, "Programming");
        assert_eq!(fewest.name, "Programming");
    }

    #[test]
    fn extremes_picks_max_and_min() {
        let s = sales(&[("Fantasy", 3), ("Programming", 9), ("History", 1)]);
        let (most, fewest) = sales_extremes(&s).unwrap();
        assert_eq!(most.name, "Programming");
        assert_eq!(fewest.name, "History");
    }

    #[test]
    fn extremes_ties_go_to_first_encountered() {
        let s = sales(&[("Fantasy", 5), ("Programming", 5), ("History", 0), ("Poetry", 0)]);
        let (most, fewest) = sales_extremes(&s).unwrap();
        assert_eq!(most.name, "Fantasy");
        assert_eq!(fewest.name, "History");
    }
}
