/*!

This is the long-form manual for `poll_trends` and `pollgrid`.

## Input

The input is a table with one poll result per row and the following columns:

| column      | content                                                    |
|-------------|------------------------------------------------------------|
| `year`      | the election. Any text, it is only used to group the rows. |
| `candidate` | the name of the candidate                                  |
| `party`     | the party label. Case does not matter.                     |
| `month`     | the sampling period within the year, an integer (1 to 5)   |
| `result`    | the result in percent, an integer                          |

Example (tab separated):

```text
year	candidate	party	month	result
2016	Clinton	D	1	48
2016	Trump	R	1	36
2016	Clinton	D	2	47
2016	Trump	R	2	38
```

`pollgrid` reads tab-separated files (`tsv`, the default), comma-separated
files (`csv`) and Excel workbooks (`xlsx`). The columns are found by name in the
first row; their order does not matter and other columns are ignored.

`month` and `result` must be integers. Blanks around the number are accepted.
Any other content fails the whole input: nothing is drawn from a partially
valid table.

## Pairs and label sides

The rows are expected to come in pairs: two candidates polled in the same year
and month, one after the other, as in the example above. In each pair, the
candidate with the higher result (the first one in case of a tie) gets its
labels above its points, the other one below.

If the table has an odd number of rows, or if the two rows of a pair are not
from the same year and month, the default policy (`reject`) fails the input.
With `skip-unpaired`, these rows are kept and simply get no label side; their
labels are drawn below the points.

## Panels

There is one panel per year, in the order of first appearance in the table.
Inside a panel, the candidates are also in the order of first appearance. The
first candidate of a panel is marked with a star in the legend.

The dot on the last sample of each line shows the change since the previous
sample, for example `+5%` or `-4%`. A line with a single sample has no change
label.

## Hover

Moving the pointer over a panel highlights the sample closest to the pointer on
every line of this panel: the pointer position is turned into a month, rounded
to the nearest month and limited to the samples of the line. Leaving the panel
removes the highlight. The right margin of a panel still belongs to the last
month.

## Configuration file

`pollgrid` can read a JSON configuration file:

```json
{
  "outputSettings": { "chartName": "Polls", "outputPath": "panels.json" },
  "dataSources": [ { "provider": "tsv", "filePath": "polls.tsv" } ],
  "layout": {
    "width": 150, "height": 120,
    "margin": { "top": 20, "right": 30, "bottom": 20, "left": 40 },
    "monthDomain": [1, 5], "percentDomain": [0, 100]
  },
  "rules": { "pairing": "reject", "computeUpper": true }
}
```

Only `outputSettings.chartName` and `dataSources` are mandatory. The paths are
relative to the configuration file. The flags given on the command line take
precedence over the configuration file.

*/
